#[derive(Clone)]
struct AppState {
    game: Arc<Mutex<GameApi>>,
}

impl AppState {
    fn new(api: GameApi) -> Self {
        Self {
            game: Arc::new(Mutex::new(api)),
        }
    }
}

fn check_schema_version(schema_version: Option<&str>) -> Result<(), HttpApiError> {
    match schema_version {
        Some(version) if version != SCHEMA_VERSION_V1 => {
            Err(HttpApiError::unsupported_version(version))
        }
        _ => Ok(()),
    }
}
