#[derive(Debug, Default, Deserialize)]
struct NewGameRequest {
    schema_version: Option<String>,
    seed: Option<i32>,
}

/// Without `phase` the cycle steps to the successor of the current phase.
#[derive(Debug, Default, Deserialize)]
struct AdvancePhaseRequest {
    schema_version: Option<String>,
    phase: Option<DayPhase>,
}

#[derive(Debug, Deserialize)]
struct ForcePhaseRequest {
    schema_version: Option<String>,
    phase: DayPhase,
}

#[derive(Debug, Serialize)]
struct PhaseResponse {
    schema_version: String,
    status: SessionStatus,
    /// Present once the day has been resolved.
    results: Option<Vec<QuestResult>>,
}

#[derive(Debug, Serialize)]
struct SaveResponse {
    schema_version: String,
    slot: Option<String>,
    current_day: i32,
}

#[derive(Debug, Serialize)]
struct ClearSaveResponse {
    schema_version: String,
    slot: Option<String>,
    removed: bool,
}

#[derive(Debug, Serialize)]
struct ListSavesResponse {
    schema_version: String,
    active_slot: Option<String>,
    saves: Vec<SaveSlotSummary>,
}

fn phase_response(game: &GameApi) -> PhaseResponse {
    let status = game.status();
    let results = (status.day_phase == DayPhase::ResolutionPhase)
        .then(|| game.last_results().to_vec());
    PhaseResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        status,
        results,
    }
}

async fn get_session(State(state): State<AppState>) -> Json<SessionStatus> {
    let game = state.game.lock().await;
    Json(game.status())
}

async fn new_game(
    State(state): State<AppState>,
    request: Option<Json<NewGameRequest>>,
) -> Result<Json<SessionStatus>, HttpApiError> {
    let request = request.map(|Json(request)| request).unwrap_or_default();
    check_schema_version(request.schema_version.as_deref())?;

    let mut game = state.game.lock().await;
    Ok(Json(game.restart(request.seed)))
}

async fn advance_phase(
    State(state): State<AppState>,
    request: Option<Json<AdvancePhaseRequest>>,
) -> Result<Json<PhaseResponse>, HttpApiError> {
    let request = request.map(|Json(request)| request).unwrap_or_default();
    check_schema_version(request.schema_version.as_deref())?;

    let mut game = state.game.lock().await;
    let advanced = match request.phase {
        Some(next) => game.try_advance(next),
        None => game.advance(),
    };
    if !advanced {
        let message = match request.phase {
            Some(next) => format!("cannot advance to {next}"),
            None => "phase cannot advance".to_string(),
        };
        return Err(HttpApiError::rejected(message, game.status().day_phase));
    }
    Ok(Json(phase_response(&game)))
}

async fn force_phase(
    State(state): State<AppState>,
    Json(request): Json<ForcePhaseRequest>,
) -> Result<Json<PhaseResponse>, HttpApiError> {
    check_schema_version(request.schema_version.as_deref())?;

    let mut game = state.game.lock().await;
    game.force_set(request.phase);
    Ok(Json(phase_response(&game)))
}

async fn save_game(State(state): State<AppState>) -> Result<Json<SaveResponse>, HttpApiError> {
    let mut game = state.game.lock().await;
    game.save_checked().map_err(HttpApiError::from_persistence)?;
    Ok(Json(SaveResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        slot: game.slot().map(str::to_string),
        current_day: game.status().current_day,
    }))
}

async fn clear_save(
    State(state): State<AppState>,
) -> Result<Json<ClearSaveResponse>, HttpApiError> {
    let mut game = state.game.lock().await;
    let removed = game.clear_save().map_err(HttpApiError::from_persistence)?;
    Ok(Json(ClearSaveResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        slot: game.slot().map(str::to_string),
        removed,
    }))
}

async fn list_saves(
    State(state): State<AppState>,
) -> Result<Json<ListSavesResponse>, HttpApiError> {
    let game = state.game.lock().await;
    let saves = game.list_slots().map_err(HttpApiError::from_persistence)?;
    Ok(Json(ListSavesResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        active_slot: game.slot().map(str::to_string),
        saves,
    }))
}
