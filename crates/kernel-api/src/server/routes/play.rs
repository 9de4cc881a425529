#[derive(Debug, Serialize)]
struct InfosResponse {
    schema_version: String,
    current_day: i32,
    day_phase: DayPhase,
    infos: Vec<InfoItem>,
}

#[derive(Debug, Serialize)]
struct InfoActionResponse {
    schema_version: String,
    info: InfoItem,
}

#[derive(Debug, Deserialize)]
struct CreateDraftRequest {
    schema_version: Option<String>,
    template: QuestTemplate,
    source_info_ids: Vec<String>,
    risk: i32,
    reward: i32,
    deadline_days: i32,
}

#[derive(Debug, Serialize)]
struct DraftsResponse {
    schema_version: String,
    drafts: Vec<QuestDraft>,
    submissions: Vec<QuestSubmission>,
    max_submissions_per_day: usize,
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    schema_version: String,
    draft_id: String,
    submitted_today: usize,
}

#[derive(Debug, Serialize)]
struct ResultsResponse {
    schema_version: String,
    current_day: i32,
    results: Vec<QuestResult>,
}

async fn get_infos(State(state): State<AppState>) -> Json<InfosResponse> {
    let game = state.game.lock().await;
    let status = game.status();
    Json(InfosResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        current_day: status.current_day,
        day_phase: status.day_phase,
        infos: game.infos().to_vec(),
    })
}

async fn act_on_info(
    Path((info_id, action)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<InfoActionResponse>, HttpApiError> {
    let action = parse_info_action(&action)?;

    let mut game = state.game.lock().await;
    let accepted = match action {
        InfoAction::Investigate => game.investigate(&info_id),
        InfoAction::Archive => game.archive(&info_id),
        InfoAction::Discard => game.discard(&info_id),
    };
    if !accepted {
        return Err(HttpApiError::rejected(
            format!("{} rejected for info {info_id}", action.as_str()),
            game.status().day_phase,
        ));
    }

    let Some(info) = game.infos().iter().find(|info| info.id == info_id).cloned() else {
        return Err(HttpApiError::internal(
            "accepted info vanished from the board",
            Some(format!("info_id={info_id}")),
        ));
    };
    Ok(Json(InfoActionResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        info,
    }))
}

async fn get_drafts(State(state): State<AppState>) -> Json<DraftsResponse> {
    let game = state.game.lock().await;
    Json(DraftsResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        drafts: game.drafts().to_vec(),
        submissions: game.session().submissions().to_vec(),
        max_submissions_per_day: game.session().config().max_submissions_per_day,
    })
}

async fn create_draft(
    State(state): State<AppState>,
    Json(request): Json<CreateDraftRequest>,
) -> Result<Json<QuestDraft>, HttpApiError> {
    check_schema_version(request.schema_version.as_deref())?;

    let mut game = state.game.lock().await;
    let draft = game.create_draft(
        request.template,
        &request.source_info_ids,
        request.risk,
        request.reward,
        request.deadline_days,
    );
    match draft {
        Some(draft) => Ok(Json(draft)),
        None => Err(HttpApiError::rejected(
            "draft rejected: sources must be unused infos from today's board",
            game.status().day_phase,
        )),
    }
}

async fn submit_draft(
    Path(draft_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SubmitResponse>, HttpApiError> {
    let mut game = state.game.lock().await;
    if !game.try_submit(&draft_id) {
        return Err(HttpApiError::rejected(
            format!("submission rejected for draft {draft_id}"),
            game.status().day_phase,
        ));
    }
    Ok(Json(SubmitResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        draft_id,
        submitted_today: game.status().submitted_today,
    }))
}

async fn get_results(State(state): State<AppState>) -> Json<ResultsResponse> {
    let game = state.game.lock().await;
    Json(ResultsResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        current_day: game.status().current_day,
        results: game.last_results().to_vec(),
    })
}
