/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: authorizer: RequestAuthorizer (token store / flag store を内包)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::features::RequestAuthorizer;

#[derive(Clone)]
pub struct AppState {
    pub authorizer: Arc<RequestAuthorizer>,
}

impl AppState {
    pub fn new(authorizer: Arc<RequestAuthorizer>) -> Self {
        Self { authorizer }
    }
}
