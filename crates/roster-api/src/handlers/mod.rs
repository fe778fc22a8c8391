//! Thin endpoint handlers. Each one declares its [`Plan`](crate::pipeline::Plan),
//! hands the payload to the coordinator, and shapes the response.

pub mod grades;
pub mod members;
pub mod organisations;
pub mod schools;
pub mod users;
