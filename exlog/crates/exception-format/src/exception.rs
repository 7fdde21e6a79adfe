mod serial;

use std::fmt;

use serde::Deserialize;

use crate::{hresult, ErrorNode};

/// An owned error node.
///
/// Built up with the `with_*` methods, or deserialized from a description
/// like this one (YAML shown; JSON works the same way):
///
/// ```yaml
/// type: monitor::RestartError
/// message: could not restart 'worker'
/// hresult: 0x80004005
/// stack_trace: |
///    at monitor::restart
///    at monitor::run
/// aggregate:
///   - type: std::io::Error
///     message: Access is denied. (os error 5)
///     hresult: -2147024891
///   - type: monitor::Timeout
///     message: gave up after 30s
/// ```
///
/// `hresult` defaults to [`hresult::E_FAIL`]. At most one of `cause` and
/// `aggregate` may be given.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serial::Exception")]
pub struct Exception {
   type_name: String,
   message: String,
   hresult: i32,
   stack_trace: Option<String>,
   inner: Inner,
}

/// What an [`Exception`] wraps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Inner {
   #[default]
   None,
   Cause(Box<Exception>),
   Aggregate(Vec<Exception>),
}

impl Exception {
   pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Exception {
      Exception {
         type_name: type_name.into(),
         message: message.into(),
         hresult: hresult::E_FAIL,
         stack_trace: None,
         inner: Inner::None,
      }
   }

   pub fn with_hresult(mut self, hresult: i32) -> Exception {
      self.hresult = hresult;
      self
   }

   pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Exception {
      self.stack_trace = Some(stack_trace.into());
      self
   }

   /// Replaces whatever this exception wrapped before.
   pub fn caused_by(mut self, cause: Exception) -> Exception {
      self.inner = Inner::Cause(Box::new(cause));
      self
   }

   /// Replaces whatever this exception wrapped before.
   pub fn aggregating<I>(mut self, children: I) -> Exception
   where
      I: IntoIterator<Item = Exception>,
   {
      self.inner = Inner::Aggregate(children.into_iter().collect());
      self
   }

   pub fn inner(&self) -> &Inner {
      &self.inner
   }
}

impl ErrorNode for Exception {
   fn type_name(&self) -> &str {
      &self.type_name
   }

   fn message(&self) -> &str {
      &self.message
   }

   fn result_code(&self) -> i32 {
      self.hresult
   }

   fn stack_trace(&self) -> Option<&str> {
      self.stack_trace.as_deref()
   }

   fn cause(&self) -> Option<&dyn ErrorNode> {
      match &self.inner {
         Inner::Cause(cause) => Some(&**cause),
         Inner::None | Inner::Aggregate(_) => None,
      }
   }

   fn children(&self) -> Vec<&dyn ErrorNode> {
      match &self.inner {
         Inner::Aggregate(children) => {
            children.iter().map(|child| child as &dyn ErrorNode).collect()
         }
         Inner::None | Inner::Cause(_) => Vec::new(),
      }
   }
}

impl fmt::Display for Exception {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "{}: {}", self.type_name, self.message)
   }
}

impl std::error::Error for Exception {
   /// An aggregate reports its first child as its source.
   fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
      match &self.inner {
         Inner::None => None,
         Inner::Cause(cause) => Some(&**cause),
         Inner::Aggregate(children) => {
            children.first().map(|child| child as &(dyn std::error::Error + 'static))
         }
      }
   }
}

#[cfg(test)]
mod tests {
   use std::error::Error;

   use super::*;

   #[test]
   fn defaults_to_e_fail_with_nothing_inside() {
      let exception = Exception::new("test::Leaf", "leaf");
      assert_eq!(exception.result_code(), hresult::E_FAIL);
      assert_eq!(exception.stack_trace(), None);
      assert_eq!(exception.inner(), &Inner::None);
   }

   #[test]
   fn aggregating_replaces_a_cause() {
      let exception = Exception::new("test::A", "a")
         .caused_by(Exception::new("test::B", "b"))
         .aggregating([Exception::new("test::C", "c")]);

      assert!(ErrorNode::cause(&exception).is_none());
      assert_eq!(exception.children().len(), 1);
   }

   #[test]
   fn displays_type_and_message() {
      let exception = Exception::new("test::Oops", "it broke");
      assert_eq!(exception.to_string(), "test::Oops: it broke");
   }

   #[test]
   fn std_source_follows_cause_or_first_child() {
      let chained = Exception::new("test::A", "a").caused_by(Exception::new("test::B", "b"));
      assert_eq!(
         Error::source(&chained).map(|e| e.to_string()),
         Some("test::B: b".to_string())
      );

      let aggregate = Exception::new("test::A", "a").aggregating([
         Exception::new("test::C", "c"),
         Exception::new("test::D", "d"),
      ]);
      assert_eq!(
         Error::source(&aggregate).map(|e| e.to_string()),
         Some("test::C: c".to_string())
      );
   }

   #[test]
   fn deserializes_from_yaml() {
      let yaml = r#"
type: monitor::RestartError
message: could not restart 'worker'
hresult: 0x80070057
stack_trace: "at a\nat b"
aggregate:
  - type: std::io::Error
    message: denied
    hresult: -2147024891
    cause:
      type: test::Inner
      message: deeper
  - type: monitor::Timeout
    message: gave up
"#;
      let exception: Exception = serde_yaml::from_str(yaml).unwrap();

      let expected = Exception::new("monitor::RestartError", "could not restart 'worker'")
         .with_hresult(hresult::E_INVALIDARG)
         .with_stack_trace("at a\nat b")
         .aggregating([
            Exception::new("std::io::Error", "denied")
               .with_hresult(0x8007_0005_u32 as i32)
               .caused_by(Exception::new("test::Inner", "deeper")),
            Exception::new("monitor::Timeout", "gave up"),
         ]);

      assert_eq!(exception, expected);
   }

   #[test]
   fn deserializes_from_json() {
      let json = r#"{
         "type": "test::Outer",
         "message": "outer",
         "hresult": 2147942487,
         "cause": { "type": "test::Inner", "message": "inner", "hresult": 5 }
      }"#;
      let exception: Exception = serde_json::from_str(json).unwrap();

      let expected = Exception::new("test::Outer", "outer")
         .with_hresult(hresult::E_INVALIDARG)
         .caused_by(Exception::new("test::Inner", "inner").with_hresult(5));

      assert_eq!(exception, expected);
   }

   #[test]
   fn reports_error_with_both_cause_and_aggregate() {
      let json = r#"{
         "type": "test::Outer",
         "message": "outer",
         "cause": { "type": "test::A", "message": "a" },
         "aggregate": [{ "type": "test::B", "message": "b" }]
      }"#;
      let err = serde_json::from_str::<Exception>(json).unwrap_err();
      assert!(err
         .to_string()
         .contains("'test::Outer' has both a `cause` and an `aggregate`"));
   }

   #[test]
   fn reports_error_with_unknown_field() {
      let json = r#"{ "type": "test::A", "message": "a", "inner": null }"#;
      assert!(serde_json::from_str::<Exception>(json).is_err());
   }
}
