use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::db::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth: Arc<dyn AuthProvider>,
}
