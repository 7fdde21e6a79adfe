//! The on-disk shape of an [`Exception`](super::Exception), which allows the
//! impossible combination of a cause *and* an aggregate and so has to be
//! checked on the way in.

use serde::Deserialize;

use crate::hresult;

use super::Inner;

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub(super) struct Exception {
   #[serde(rename = "type")]
   type_name: String,
   message: String,
   #[serde(default = "default_hresult", deserialize_with = "hresult::deserialize")]
   hresult: i32,
   #[serde(default)]
   stack_trace: Option<String>,
   #[serde(default)]
   cause: Option<Box<Exception>>,
   #[serde(default)]
   aggregate: Option<Vec<Exception>>,
}

fn default_hresult() -> i32 {
   hresult::E_FAIL
}

impl TryFrom<Exception> for super::Exception {
   type Error = String;

   fn try_from(serial: Exception) -> Result<Self, Self::Error> {
      let inner = match (serial.cause, serial.aggregate) {
         (Some(_), Some(_)) => {
            return Err(format!(
               "'{}' has both a `cause` and an `aggregate`; use one or the other",
               serial.type_name
            ))
         }
         (Some(cause), None) => Inner::Cause(Box::new(super::Exception::try_from(*cause)?)),
         (None, Some(children)) => Inner::Aggregate(
            children
               .into_iter()
               .map(super::Exception::try_from)
               .collect::<Result<_, _>>()?,
         ),
         (None, None) => Inner::None,
      };

      Ok(super::Exception {
         type_name: serial.type_name,
         message: serial.message,
         hresult: serial.hresult,
         stack_trace: serial.stack_trace,
         inner,
      })
   }
}
