use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::catalog::ProblemCatalog;
use crate::config::AppConfig;
use crate::judge::{JudgeClient, Translator};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub judge: Arc<JudgeClient>,
    pub translator: Arc<Translator>,
    pub catalog: Arc<dyn ProblemCatalog>,
}
