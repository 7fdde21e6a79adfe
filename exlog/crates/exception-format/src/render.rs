use std::collections::HashSet;

use crate::{hresult, lines, ErrorNode};

/// How far below the starting indent a [`Renderer`] goes before giving up on a
/// branch, unless told otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 256;

// Enough for a handful of errors with short stack traces.
const INITIAL_CAPACITY: usize = 5000;

// Nodes already written during one render, by address and vtable.
type Seen<'e> = HashSet<*const (dyn ErrorNode + 'e)>;

/// Render `error` and everything below it, after a `header` line.
///
/// Every line, the header included, ends with `line_separator`. Each hop to a
/// cause or to an aggregated child is indented by one more tab, starting from
/// `initial_indent` tabs. An absent `error` produces only the header line.
pub fn render(
   error: Option<&dyn ErrorNode>,
   header: &str,
   line_separator: &str,
   initial_indent: usize,
) -> String {
   Renderer::new(line_separator)
      .with_indent(initial_indent)
      .render(error, header)
}

/// [`render`], starting without indentation.
pub fn render_with_header(
   error: Option<&dyn ErrorNode>,
   header: &str,
   line_separator: &str,
) -> String {
   render(error, header, line_separator, 0)
}

/// Rendering settings, reusable across any number of errors.
///
/// A node reached a second time during one render, whether through a cycle or
/// because two branches share it, is written out only once. Later visits leave
/// a single `[repeated error omitted: ...]` line instead, so the output never
/// grows beyond one entry per node in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
   line_separator: String,
   indent: usize,
   max_depth: Option<usize>,
}

impl Renderer {
   pub fn new(line_separator: impl Into<String>) -> Renderer {
      Renderer {
         line_separator: line_separator.into(),
         indent: 0,
         max_depth: Some(DEFAULT_MAX_DEPTH),
      }
   }

   pub fn with_indent(mut self, indent: usize) -> Renderer {
      self.indent = indent;
      self
   }

   /// Stop descending once a node is more than `max_depth` hops below the
   /// starting indent, leaving a marker line in place of the rest of that
   /// branch. `None` follows the graph all the way down.
   pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Renderer {
      self.max_depth = max_depth;
      self
   }

   pub fn unbounded(self) -> Renderer {
      self.with_max_depth(None)
   }

   pub fn line_separator(&self) -> &str {
      &self.line_separator
   }

   pub fn indent(&self) -> usize {
      self.indent
   }

   pub fn max_depth(&self) -> Option<usize> {
      self.max_depth
   }

   pub fn render(&self, error: Option<&dyn ErrorNode>, header: &str) -> String {
      let mut out = String::with_capacity(INITIAL_CAPACITY);
      out.push_str(header);
      out.push_str(&self.line_separator);

      if let Some(error) = error {
         let mut seen = Seen::new();
         self.render_chain(error, self.indent, &mut seen, &mut out);
      }

      out
   }

   fn render_chain<'e>(
      &self,
      mut error: &'e dyn ErrorNode,
      mut indent: usize,
      seen: &mut Seen<'e>,
      out: &mut String,
   ) {
      loop {
         if let Some(max_depth) = self.exceeded_depth(indent) {
            self.push_line(
               out,
               indent,
               &format!("[nested errors omitted: depth limit of {max_depth} reached]"),
            );
            return;
         }

         if !seen.insert(error) {
            self.push_line(
               out,
               indent,
               &format!(
                  "[repeated error omitted: {} was rendered above]",
                  error.type_name()
               ),
            );
            return;
         }

         self.render_node(error, indent, out);

         // An aggregate ends the chain: its children carry the causes.
         let children = error.children();
         if !children.is_empty() {
            for child in children {
               self.render_chain(child, indent + 1, seen, out);
            }
            return;
         }

         match error.cause() {
            Some(cause) => {
               error = cause;
               indent += 1;
            }
            None => return,
         }
      }
   }

   fn render_node(&self, error: &dyn ErrorNode, indent: usize, out: &mut String) {
      let prefix = "\t".repeat(indent);
      let separator = self.line_separator.as_str();

      out.push_str(&prefix);
      out.push_str(error.type_name());
      out.push_str(": ");
      out.push_str(error.message());
      out.push_str(separator);

      out.push_str(&prefix);
      out.push_str("HRESULT: 0x");
      out.push_str(&hresult::to_hex(error.result_code()));
      out.push_str(separator);

      for line in error.stack_trace().into_iter().flat_map(lines::split) {
         out.push_str(&prefix);
         out.push_str(line);
         out.push_str(separator);
      }
   }

   fn exceeded_depth(&self, indent: usize) -> Option<usize> {
      self
         .max_depth
         .filter(|max_depth| indent - self.indent > *max_depth)
   }

   fn push_line(&self, out: &mut String, indent: usize, text: &str) {
      out.push_str(&"\t".repeat(indent));
      out.push_str(text);
      out.push_str(&self.line_separator);
   }
}
