//! Gateway response module
//!
//! Parses the XML gateway response into typed blocks:
//!
//! ```text
//! <response>
//!   <control>status, senderid, controlid</control>
//!   <operation>
//!     <authentication>status, userid, companyid</authentication>
//!     <result>status, function, controlid, <data .../>, <errormessage/></result>
//!   </operation>
//! </response>
//! ```
//!
//! Envelope-level failures (control or authentication) become
//! [`Error::Response`](crate::Error::Response) at parse time. Function-level
//! failures are left on the [`OperationResult`] for callers to inspect.

mod parser;
mod types;

pub use parser::parse_response;
pub use types::{
    AuthenticationBlock, ControlBlock, ErrorDescriptor, Operation, OperationResult, Response,
    ResultData, ResultStatus,
};
