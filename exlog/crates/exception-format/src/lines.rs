//! Splitting captured stack text into lines, regardless of which platform
//! produced it.

/// Split `text` on `\r\n`, `\n` or a lone `\r`.
///
/// Unlike [`str::split`], a trailing terminator does not produce a final empty
/// line, and empty text produces no lines at all.
pub fn split(text: &str) -> Lines<'_> {
   Lines { rest: text }
}

pub struct Lines<'t> {
   rest: &'t str,
}

impl<'t> Iterator for Lines<'t> {
   type Item = &'t str;

   fn next(&mut self) -> Option<&'t str> {
      if self.rest.is_empty() {
         return None;
      }

      match self.rest.find(|c: char| c == '\r' || c == '\n') {
         Some(end) => {
            let line = &self.rest[..end];
            let terminator = if self.rest[end..].starts_with("\r\n") {
               2
            } else {
               1
            };
            self.rest = &self.rest[end + terminator..];
            Some(line)
         }
         None => {
            let line = self.rest;
            self.rest = "";
            Some(line)
         }
      }
   }
}
