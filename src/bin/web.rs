//! Single binary web server: one court session in memory, JSON API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! State is saved to STATE_FILE (default court_queue.json) after every change unless AUTOSAVE=false,
//! and always on Ctrl-C.

use actix_web::{
    delete, get, post, put,
    web::{Bytes, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use court_queue_web::{
    court_announcement, end_match, group_color, import_members_csv, join_queue,
    join_queue_as_group, now_millis, reorder_queue_item, rest_all_queue, session_blocks,
    start_match, store, unbind_from_group, withdraw_from_queue, CourtId, DisplaySlot, Entrant,
    EntrantId, GroupId, MatchTag, Member, MemberId, ReorderMove, Session, SessionError,
    SessionStats, SkillLevel,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

/// The live session plus where to persist it.
struct SessionEntry {
    session: Session,
    state_file: PathBuf,
    /// Save after every successful change.
    autosave: bool,
}

impl SessionEntry {
    fn persist(&self) {
        if let Err(e) = store::save(&self.state_file, &self.session) {
            log::warn!("Could not save state to {}: {}", self.state_file.display(), e);
        }
    }
}

type AppState = Data<RwLock<SessionEntry>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// One prospective match in the queue view.
#[derive(Serialize)]
struct BlockView<'a> {
    index: usize,
    playable: bool,
    tag: Option<MatchTag>,
    slots: Vec<DisplaySlot<'a>>,
}

/// Everything the client renders: raw state plus derived queue views.
#[derive(Serialize)]
struct SessionView<'a> {
    session: &'a Session,
    stats: SessionStats,
    bench: Vec<&'a Entrant>,
    queue: Vec<BlockView<'a>>,
    /// True when the next block can start on a free court.
    ready: bool,
    group_colors: BTreeMap<GroupId, &'static str>,
}

impl<'a> SessionView<'a> {
    fn new(session: &'a Session) -> Self {
        let blocks = session_blocks(session);
        let ready = blocks.first().map(|b| b.is_playable()).unwrap_or(false);
        let group_colors = session
            .entrants
            .iter()
            .filter_map(|e| e.group_id)
            .map(|g| (g, group_color(g)))
            .collect();
        let queue = blocks
            .iter()
            .map(|b| BlockView {
                index: b.index,
                playable: b.is_playable(),
                tag: b.tag(),
                slots: b.slots().collect(),
            })
            .collect();
        Self {
            session,
            stats: session.stats(),
            bench: session.bench(),
            queue,
            ready,
            group_colors,
        }
    }
}

#[derive(Serialize)]
struct ActionResponse<'a, T: Serialize> {
    result: T,
    #[serde(flatten)]
    view: SessionView<'a>,
}

#[derive(Serialize)]
struct MemberSearchResponse<'a> {
    checked_in: Vec<&'a Member>,
    not_checked_in: Vec<&'a Member>,
}

#[derive(Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Deserialize)]
struct CheckInBody {
    name: String,
    #[serde(default)]
    level: SkillLevel,
}

#[derive(Deserialize)]
struct LevelBody {
    level: SkillLevel,
}

#[derive(Deserialize)]
struct GroupJoinBody {
    entrant_ids: Vec<EntrantId>,
}

#[derive(Deserialize)]
struct ReorderBody {
    #[serde(rename = "move")]
    mv: ReorderMove,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Deserialize)]
struct EntrantPath {
    id: EntrantId,
}

#[derive(Deserialize)]
struct MemberPath {
    id: MemberId,
}

#[derive(Deserialize)]
struct CourtPath {
    id: CourtId,
}

fn error_response(e: &SessionError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    if e.is_not_found() {
        HttpResponse::NotFound().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

/// Apply one operation to the session as a whole transition, persist, and return the new view.
fn mutate<T, F>(state: &AppState, op: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&mut Session) -> Result<T, SessionError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let (next, result) = match g.session.apply(op) {
        Ok(applied) => applied,
        Err(e) => {
            log::debug!("Rejected: {}", e);
            return error_response(&e);
        }
    };
    g.session = next;
    if g.autosave {
        g.persist();
    }
    HttpResponse::Ok().json(ActionResponse {
        result,
        view: SessionView::new(&g.session),
    })
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "court-queue-web",
    })
}

/// Full state with derived queue blocks, bench and stats.
#[get("/api/session")]
async fn api_get_session(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(SessionView::new(&g.session))
}

/// End of day: everyone to the bench, courts cleared.
#[post("/api/session/reset")]
async fn api_reset_session(state: AppState) -> HttpResponse {
    mutate(&state, |s| {
        s.reset_session();
        Ok(())
    })
}

/// Roster search, split by check-in status.
#[get("/api/members")]
async fn api_search_members(state: AppState, query: Query<SearchQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let (checked_in, not_checked_in) = g.session.search_members(&query.q);
    HttpResponse::Ok().json(MemberSearchResponse {
        checked_in,
        not_checked_in,
    })
}

#[post("/api/members")]
async fn api_create_member(state: AppState, body: Json<NameBody>) -> HttpResponse {
    mutate(&state, |s| s.create_member(&body.name, now_millis()))
}

/// CSV body with a `name` column and optional `level` column.
#[post("/api/members/import")]
async fn api_import_members(state: AppState, body: Bytes) -> HttpResponse {
    mutate(&state, |s| import_members_csv(s, body.as_ref(), now_millis()))
}

#[delete("/api/members/{id}")]
async fn api_remove_member(state: AppState, path: Path<MemberPath>) -> HttpResponse {
    mutate(&state, |s| s.remove_member(path.id))
}

#[put("/api/members/{id}/level")]
async fn api_set_member_level(state: AppState, path: Path<MemberPath>, body: Json<LevelBody>) -> HttpResponse {
    mutate(&state, |s| s.update_member_level(path.id, body.level))
}

#[post("/api/members/{id}/check-in")]
async fn api_check_in_member(state: AppState, path: Path<MemberPath>) -> HttpResponse {
    mutate(&state, |s| s.check_in_member(path.id, now_millis()))
}

/// Walk-in check-in without a roster entry.
#[post("/api/entrants")]
async fn api_check_in(state: AppState, body: Json<CheckInBody>) -> HttpResponse {
    mutate(&state, |s| s.check_in(&body.name, body.level, now_millis()))
}

/// Early leave.
#[delete("/api/entrants/{id}")]
async fn api_remove_entrant(state: AppState, path: Path<EntrantPath>) -> HttpResponse {
    mutate(&state, |s| s.remove_entrant(path.id))
}

#[put("/api/entrants/{id}/level")]
async fn api_set_entrant_level(state: AppState, path: Path<EntrantPath>, body: Json<LevelBody>) -> HttpResponse {
    mutate(&state, |s| s.update_entrant_level(path.id, body.level))
}

#[post("/api/entrants/{id}/queue")]
async fn api_join_queue(state: AppState, path: Path<EntrantPath>) -> HttpResponse {
    mutate(&state, |s| join_queue(s, path.id, now_millis()))
}

#[delete("/api/entrants/{id}/queue")]
async fn api_withdraw(state: AppState, path: Path<EntrantPath>) -> HttpResponse {
    mutate(&state, |s| withdraw_from_queue(s, path.id))
}

#[post("/api/entrants/{id}/unbind")]
async fn api_unbind(state: AppState, path: Path<EntrantPath>) -> HttpResponse {
    mutate(&state, |s| unbind_from_group(s, path.id))
}

/// Body: {"move": "up"} / {"move": "down"} / {"move": {"onto": "<entrant id>"}}
#[post("/api/entrants/{id}/reorder")]
async fn api_reorder(state: AppState, path: Path<EntrantPath>, body: Json<ReorderBody>) -> HttpResponse {
    mutate(&state, |s| reorder_queue_item(s, path.id, body.mv))
}

#[post("/api/queue/group")]
async fn api_join_group(state: AppState, body: Json<GroupJoinBody>) -> HttpResponse {
    mutate(&state, |s| join_queue_as_group(s, &body.entrant_ids, now_millis()))
}

#[post("/api/queue/rest-all")]
async fn api_rest_all(state: AppState) -> HttpResponse {
    mutate(&state, |s| Ok(rest_all_queue(s)))
}

#[post("/api/bench/clear")]
async fn api_clear_bench(state: AppState) -> HttpResponse {
    mutate(&state, |s| Ok(s.clear_bench()))
}

#[post("/api/courts")]
async fn api_add_court(state: AppState) -> HttpResponse {
    mutate(&state, |s| Ok(s.add_court()))
}

/// Removes the highest-numbered court.
#[delete("/api/courts/last")]
async fn api_remove_court(state: AppState) -> HttpResponse {
    mutate(&state, |s| s.remove_court())
}

/// Start the next block on this court; result is the call-up announcement.
#[post("/api/courts/{id}/start")]
async fn api_start_match(state: AppState, path: Path<CourtPath>) -> HttpResponse {
    mutate(&state, |s| {
        start_match(s, path.id, now_millis())?;
        court_announcement(s, path.id)
    })
}

#[post("/api/courts/{id}/end")]
async fn api_end_match(state: AppState, path: Path<CourtPath>) -> HttpResponse {
    mutate(&state, |s| end_match(s, path.id))
}

#[get("/api/courts/{id}/announcement")]
async fn api_announcement(state: AppState, path: Path<CourtPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match court_announcement(&g.session, path.id) {
        Ok(text) => HttpResponse::Ok().json(serde_json::json!({
            "text": text,
            "elapsed": g.session.court(path.id).map(|c| c.elapsed_label(now_millis())).unwrap_or_default(),
        })),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_state_file() -> String {
    "court_queue.json".to_string()
}

fn default_court_count() -> u32 {
    court_queue_web::INITIAL_COURT_COUNT
}

/// Runtime configuration from the environment.
struct Settings {
    host: String,
    port: u16,
    state_file: PathBuf,
    court_count: u32,
    autosave: bool,
}

impl Settings {
    fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_port),
            state_file: PathBuf::from(
                std::env::var("STATE_FILE").unwrap_or_else(|_| default_state_file()),
            ),
            court_count: std::env::var("COURT_COUNT")
                .ok()
                .and_then(|c| c.parse().ok())
                .filter(|c| *c > 0)
                .unwrap_or_else(default_court_count),
            autosave: std::env::var("AUTOSAVE")
                .map(|v| !v.eq_ignore_ascii_case("false") && v != "0")
                .unwrap_or(true),
        }
    }
}

fn save_on_shutdown(state: &AppState) {
    match state.read() {
        Ok(g) => g.persist(),
        Err(_) => log::warn!("Session lock poisoned; state not saved"),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env();
    let session = store::load(&settings.state_file, settings.court_count)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    let state = Data::new(RwLock::new(SessionEntry {
        session,
        state_file: settings.state_file.clone(),
        autosave: settings.autosave,
    }));
    let shutdown_state = state.clone();

    let bind = (settings.host.as_str(), settings.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_get_session)
            .service(api_reset_session)
            .service(api_search_members)
            .service(api_import_members)
            .service(api_create_member)
            .service(api_remove_member)
            .service(api_set_member_level)
            .service(api_check_in_member)
            .service(api_check_in)
            .service(api_remove_entrant)
            .service(api_set_entrant_level)
            .service(api_join_queue)
            .service(api_withdraw)
            .service(api_unbind)
            .service(api_reorder)
            .service(api_join_group)
            .service(api_rest_all)
            .service(api_clear_bench)
            .service(api_add_court)
            .service(api_remove_court)
            .service(api_start_match)
            .service(api_end_match)
            .service(api_announcement)
    })
    .disable_signals()
    .bind(bind)?
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            log::warn!("Could not listen for Ctrl-C; state is only saved per change");
            return;
        }
        log::info!("Shutting down, saving session");
        save_on_shutdown(&shutdown_state);
        handle.stop(true).await;
    });

    server.await
}
