pub mod access;
pub mod bytecode;
pub mod error;
pub mod message;
pub mod traversal;

pub use access::AccessType;
pub use bytecode::{Bytecode, Instruction};
pub use error::{CoreError, Result};
pub use message::{
    InboundMessage, RequestMessage, ResponseMessage, ResponseMessageBuilder, ResponseStatus,
    ResponseStatusCode,
};
pub use traversal::TraversalSource;
