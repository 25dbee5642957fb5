pub mod authorizer;
pub mod factory;
pub mod header;
pub mod types;

pub use authorizer::RequestAuthorizer;
pub use factory::build_authorizer;
pub use types::{ActiveFeatureSet, Event, InvocationContext};
