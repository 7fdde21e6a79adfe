/// One raised error, as far as rendering is concerned.
///
/// A node either has a single [`cause`](ErrorNode::cause) or a list of
/// [`children`](ErrorNode::children). When a node reports any children, its
/// cause is never looked at.
pub trait ErrorNode {
   /// The fully-qualified name of the error's type, e.g. `std::io::Error`.
   fn type_name(&self) -> &str;

   fn message(&self) -> &str;

   /// The platform result code (an HRESULT) carried by the error.
   fn result_code(&self) -> i32;

   /// Stack frames, one per line, if any were captured.
   fn stack_trace(&self) -> Option<&str> {
      None
   }

   /// The error which caused this one.
   fn cause(&self) -> Option<&dyn ErrorNode> {
      None
   }

   /// The independent failures this error aggregates, in order.
   fn children(&self) -> Vec<&dyn ErrorNode> {
      Vec::new()
   }
}
