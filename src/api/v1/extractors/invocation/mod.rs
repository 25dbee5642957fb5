/*!
 * Invocation context extractor
 *
 * Responsibility:
 * - request id (x-request-id) を InvocationContext として handler に提供する
 * - request id は middleware::http が生成/伝搬済みである前提
 */

mod core;

pub use self::core::{Invocation, REQUEST_ID_HEADER, context_from_headers};
