//! Polidraft REPL: a terminal front end for the policy-drafting assistant.

mod render;

use std::borrow::Cow::{self, Borrowed, Owned};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use chrono::Utc;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use polidraft_core::auth::FailureOutcome;
use polidraft_core::chat::manager::ChatSessionManager;
use polidraft_core::chat::{SearchType, UiStateStore};
use polidraft_core::flow::{FlowStep, OrganizerSection};
use polidraft_core::graph::{GraphNode, NetworkGraph};
use polidraft_gateway::types::{
    Coworker, LoginRequest, ProjectCreateRequest, ProjectStepSectionRequest,
};
use polidraft_gateway::{Endpoint, GatewayClient, GatewayConfig};
use polidraft_infrastructure::{ClientConfig, JsonSessionStore, JsonUiStateStore};

const COMMANDS: &[&str] = &[
    "/fact",
    "/network",
    "/flow",
    "/new",
    "/sessions",
    "/switch",
    "/login",
    "/logout",
    "/whoami",
    "/projects",
    "/project",
    "/organizer",
    "/graph",
    "/state",
    "/health",
    "/help",
];

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Mutable REPL context besides the session manager.
struct App {
    manager: Arc<ChatSessionManager>,
    client: GatewayClient,
    ui_state: Arc<JsonUiStateStore>,
    /// Logged-in user, if any. The token lives inside `client`.
    user: Option<Coworker>,
    /// Flow step applied to plain sends, `/flow off` clears it.
    flow_step: Option<FlowStep>,
    /// Project id applied to sends and organizer commands.
    project_id: Option<String>,
    /// Coworker id used for people searches and project listing.
    coworker_id: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::load().context("failed to load client configuration")?;
    let endpoint = Endpoint::resolve(config.endpoint.as_deref(), config.proxy_origin.as_deref());
    let mut gateway_config = GatewayConfig::new(endpoint);
    if let Some(secs) = config.timeout_secs {
        gateway_config = gateway_config.with_timeout(Duration::from_secs(secs));
    }
    let client = GatewayClient::new(gateway_config);

    let session_store =
        Arc::new(JsonSessionStore::default_location().context("failed to resolve session path")?);
    let ui_state =
        Arc::new(JsonUiStateStore::default_location().context("failed to resolve state path")?);

    let manager = Arc::new(ChatSessionManager::new(
        session_store,
        ui_state.clone(),
        Arc::new(client.clone()),
    ));
    manager.load().await;

    let mut app = App {
        manager,
        client,
        ui_state,
        user: None,
        flow_step: None,
        project_id: None,
        coworker_id: config.coworker_id.unwrap_or(0),
    };

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Polidraft ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message to chat, '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();

    loop {
        let prompt = match (&app.project_id, app.flow_step) {
            (Some(project), Some(step)) => format!("{}:{} >> ", project, step),
            (Some(project), None) => format!("{} >> ", project),
            (None, Some(step)) => format!("{} >> ", step),
            (None, None) => ">> ".to_string(),
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if let Err(err) = dispatch(&mut app, &mut rl, trimmed).await {
                    eprintln!("{}", format!("Error: {}", err).red());
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

async fn dispatch(
    app: &mut App,
    rl: &mut Editor<CliHelper, DefaultHistory>,
    input: &str,
) -> Result<()> {
    let (command, rest) = match input.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };

    match command {
        "/help" => print_help(),
        "/fact" => send(app, rest, Some(SearchType::Fact)).await,
        "/network" => send(app, rest, Some(SearchType::Network)).await,
        "/flow" => set_flow(app, rest),
        "/new" => {
            app.manager.start_new_chat().await;
            println!("{}", "Started a new chat.".bright_green());
        }
        "/sessions" => {
            let sessions = app.manager.sessions().await;
            let active = app.manager.active_session_id().await;
            render::print_sessions(&sessions, active.as_deref());
        }
        "/switch" => switch_session(app, rest).await,
        "/login" => login(app, rl, rest).await?,
        "/logout" => logout(app).await,
        "/whoami" => whoami(app).await,
        "/projects" => list_projects(app, rest).await,
        "/project" => show_project(app, rest).await,
        "/organizer" => organizer(app, rest).await,
        "/graph" => show_graph(app, rest).await,
        "/state" => show_state(app).await,
        "/health" => {
            if app.client.test_connection().await {
                println!("{}", "Backend is reachable.".bright_green());
            } else {
                println!("{}", "Backend is not reachable.".red());
            }
        }
        _ if command.starts_with('/') => {
            println!("{}", "Unknown command".bright_black());
        }
        _ => send(app, input, None).await,
    }
    Ok(())
}

fn print_help() {
    println!("{}", "Commands:".bright_yellow());
    println!("  <text>              send a chat message");
    println!("  /fact <q>           fact search");
    println!("  /network <q>        people-network search");
    println!("  /flow <step|off>    route plain sends through a flow step");
    println!("  /new /sessions /switch <n>");
    println!("  /login <email> /logout /whoami");
    println!("  /projects [new <name>]  /project <id>");
    println!("  /organizer [set <key> <text> | pull | push]");
    println!("  /graph <candidate-id> [node-id]   /state   /health");
}

/// Sends a message and prints what it appended to the transcript.
async fn send(app: &App, content: &str, search_type: Option<SearchType>) {
    if content.is_empty() {
        println!("{}", "Nothing to send.".bright_black());
        return;
    }
    let before = app.manager.messages().await.len();
    println!("{}", format!("> {}", content).green());
    app.manager
        .send_message(content, search_type, app.flow_step, app.project_id.as_deref())
        .await;

    let messages = app.manager.messages().await;
    let cards = app.manager.people_cards().await;
    render::print_transcript(&messages[before..], &cards);
}

fn set_flow(app: &mut App, rest: &str) {
    if rest.is_empty() {
        match app.flow_step {
            Some(step) => println!("Flow step: {} ({})", step, step.label()),
            None => println!("{}", "No flow step set.".bright_black()),
        }
        return;
    }
    if rest == "off" {
        app.flow_step = None;
        println!("{}", "Flow step cleared.".bright_green());
        return;
    }
    match FlowStep::from_str(rest) {
        Ok(step) => {
            app.flow_step = Some(step);
            println!(
                "{}",
                format!("Plain sends now use the {} step ({}).", step, step.label())
                    .bright_green()
            );
        }
        Err(_) => println!(
            "{}",
            "Unknown step. Use analysis, objective, concept, plan or proposal.".red()
        ),
    }
}

async fn switch_session(app: &App, rest: &str) {
    let sessions = app.manager.sessions().await;
    let Ok(index) = rest.parse::<usize>() else {
        println!("{}", "Usage: /switch <number from /sessions>".bright_black());
        return;
    };
    match sessions.get(index.wrapping_sub(1)) {
        Some(session) => {
            app.manager.select_session(&session.id).await;
            println!("{}", format!("Switched to: {}", session.title).bright_green());
            let messages = app.manager.visible_messages().await;
            let cards = app.manager.people_cards().await;
            render::print_transcript(&messages, &cards);
        }
        None => println!("{}", "No such session.".red()),
    }
}

async fn login(
    app: &mut App,
    rl: &mut Editor<CliHelper, DefaultHistory>,
    email: &str,
) -> Result<()> {
    if email.is_empty() {
        println!("{}", "Usage: /login <email>".bright_black());
        return Ok(());
    }

    let record = app.ui_state.lockout_record().await;
    let now = Utc::now();
    if record.is_locked(now) {
        if let Some(remaining) = record.remaining(now) {
            println!(
                "{}",
                format!(
                    "ログインは一時的にロックされています。あと{}秒お待ちください。",
                    remaining.num_seconds().max(1)
                )
                .red()
            );
        }
        return Ok(());
    }

    let password = rl.readline("password: ")?;
    let request = LoginRequest {
        email: email.to_string(),
        password: password.trim().to_string(),
    };

    match app.client.login(&request).await {
        Ok(response) => {
            if let Err(err) = app.ui_state.clear_lockout_record().await {
                tracing::warn!("failed to clear lockout record: {}", err);
            }
            println!(
                "{}",
                format!("ログインしました: {}", response.user.name).bright_green()
            );
            app.coworker_id = response.user.id;
            app.user = Some(response.user);
            app.client = app.client.clone().with_token(response.token);
        }
        Err(err) if err.is_transport() => {
            println!(
                "{}",
                "バックエンドサーバーに接続できません。サーバーが起動しているか確認してください。"
                    .red()
            );
        }
        Err(err) => {
            tracing::debug!("login rejected: {}", err);
            let (next, outcome) = record.register_failure(now);
            if let Err(save_err) = app.ui_state.save_lockout_record(&next).await {
                tracing::warn!("failed to save lockout record: {}", save_err);
            }
            match outcome {
                FailureOutcome::AttemptsLeft(left) => println!(
                    "{}",
                    format!(
                        "メールアドレスまたはパスワードが正しくありません。（残り{}回）",
                        left
                    )
                    .red()
                ),
                FailureOutcome::LockedOut => println!(
                    "{}",
                    "試行回数の上限に達しました。5分後に再試行してください。".red()
                ),
            }
        }
    }
    Ok(())
}

async fn logout(app: &mut App) {
    if app.user.is_none() {
        println!("{}", "Not logged in.".bright_black());
        return;
    }
    if let Err(err) = app.client.logout().await {
        tracing::debug!("logout call failed: {}", err);
    }
    app.user = None;
    app.client = GatewayClient::new(app.client.config().clone());
    println!("{}", "Logged out.".bright_green());
}

async fn whoami(app: &App) {
    // Fall back to the server's view when no login happened this run.
    let user = match &app.user {
        Some(user) => user.clone(),
        None => match app.client.current_user().await {
            Ok(user) => user,
            Err(_) => {
                println!("{}", "Not logged in.".bright_black());
                return;
            }
        },
    };
    let mut line = format!("{} <{}>", user.name, user.email);
    if let Some(department) = &user.department_name {
        line.push_str(&format!(" / {}", department));
    }
    println!("{}", line.cyan());
}

async fn list_projects(app: &App, rest: &str) {
    if let Some(name) = rest.strip_prefix("new ") {
        let request = ProjectCreateRequest {
            name: name.trim().to_string(),
            description: None,
            owner_coworker_id: app.coworker_id,
            member_ids: vec![app.coworker_id],
        };
        match app.client.create_project(&request).await {
            Ok(project) => println!(
                "{}",
                format!("Created project {} ({})", project.name, project.id).bright_green()
            ),
            Err(err) => println!("{}", format!("作成に失敗しました: {}", err).red()),
        }
        return;
    }
    match app.client.projects_by_coworker(app.coworker_id).await {
        Ok(projects) if projects.is_empty() => {
            println!("{}", "No projects.".bright_black());
        }
        Ok(projects) => {
            for project in projects {
                println!(
                    "{}  {}  {}",
                    project.id.cyan(),
                    project.name,
                    format!("[{}]", project.status).bright_black()
                );
            }
        }
        Err(err) => println!("{}", format!("プロジェクトを取得できません: {}", err).red()),
    }
}

async fn show_project(app: &mut App, rest: &str) {
    if rest.is_empty() {
        println!("{}", "Usage: /project <id>".bright_black());
        return;
    }
    match app.client.project(rest).await {
        Ok(project) => {
            println!("{} {}", project.name.bright_yellow().bold(), project.id.bright_black());
            if let Some(description) = &project.description {
                println!("{}", description);
            }
            println!(
                "owner: {}  members: {}",
                project.owner_name,
                project
                    .members
                    .iter()
                    .map(|m| m.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            app.project_id = Some(project.id);
            println!("{}", "Sends now carry this project.".bright_green());
        }
        Err(err) => println!("{}", format!("プロジェクトを取得できません: {}", err).red()),
    }
}

async fn organizer(app: &App, rest: &str) {
    let (Some(project_id), Some(step)) = (app.project_id.as_deref(), app.flow_step) else {
        println!(
            "{}",
            "Select a project (/project <id>) and a flow step (/flow <step>) first.".bright_black()
        );
        return;
    };

    if rest.is_empty() {
        match app.ui_state.organizer_draft(project_id, step).await {
            Some(sections) if !sections.is_empty() => {
                for section in sections {
                    let heading = section.label.as_deref().unwrap_or(&section.section_key);
                    println!("{}", heading.bright_yellow());
                    println!("  {}", section.content);
                }
            }
            _ => println!("{}", "No draft sections yet.".bright_black()),
        }
        let saved = app.ui_state.organizer_saved(project_id, step).await;
        if saved {
            println!("{}", "(pushed to the backend)".bright_black());
        }
        return;
    }

    if let Some(section) = rest.strip_prefix("set ") {
        let Some((key, content)) = section.split_once(' ') else {
            println!("{}", "Usage: /organizer set <key> <text>".bright_black());
            return;
        };
        let mut sections = app
            .ui_state
            .organizer_draft(project_id, step)
            .await
            .unwrap_or_default();
        match sections.iter_mut().find(|s| s.section_key == key) {
            Some(existing) => existing.content = content.to_string(),
            None => sections.push(OrganizerSection {
                section_key: key.to_string(),
                content: content.to_string(),
                label: None,
            }),
        }
        match app
            .ui_state
            .save_organizer_draft(project_id, step, &sections)
            .await
        {
            Ok(()) => println!("{}", "Draft saved.".bright_green()),
            Err(err) => println!("{}", format!("Failed to save draft: {}", err).red()),
        }
        return;
    }

    if rest == "pull" {
        match app.client.project_step_sections(project_id, &step.to_string()).await {
            Ok(rows) => {
                let sections: Vec<OrganizerSection> = rows
                    .into_iter()
                    .map(|row| OrganizerSection {
                        section_key: row.section_key,
                        content: row.content,
                        label: row.label,
                    })
                    .collect();
                if sections.is_empty() {
                    println!("{}", "The backend has no sections for this step.".bright_black());
                    return;
                }
                match app
                    .ui_state
                    .save_organizer_draft(project_id, step, &sections)
                    .await
                {
                    Ok(()) => println!(
                        "{}",
                        format!("Pulled {} sections into the draft.", sections.len()).bright_green()
                    ),
                    Err(err) => println!("{}", format!("Failed to save draft: {}", err).red()),
                }
            }
            Err(err) => println!("{}", format!("取得に失敗しました: {}", err).red()),
        }
        return;
    }

    if rest == "push" {
        let sections = app
            .ui_state
            .organizer_draft(project_id, step)
            .await
            .unwrap_or_default();
        if sections.is_empty() {
            println!("{}", "Nothing to push.".bright_black());
            return;
        }
        let request = ProjectStepSectionRequest {
            project_id: project_id.to_string(),
            step_key: step.to_string(),
            sections,
        };
        match app.client.save_project_step_sections(&request).await {
            Ok(rows) => {
                if let Err(err) = app.ui_state.mark_organizer_saved(project_id, step).await {
                    tracing::warn!("failed to record organizer marker: {}", err);
                }
                println!("{}", format!("Pushed {} sections.", rows.len()).bright_green());
            }
            Err(err) => println!("{}", format!("保存に失敗しました: {}", err).red()),
        }
        return;
    }

    println!(
        "{}",
        "Usage: /organizer [set <key> <text> | pull | push]".bright_black()
    );
}

async fn show_graph(app: &App, rest: &str) {
    let mut parts = rest.split_whitespace();
    let Some(candidate_id) = parts.next().and_then(|s| s.parse::<i64>().ok()) else {
        println!("{}", "Usage: /graph <candidate-id> [node-id]".bright_black());
        return;
    };
    match app.client.candidate_detail(candidate_id).await {
        Ok(detail) => {
            // A second argument follows a coworker node instead of
            // drawing the graph again.
            if let Some(node_id) = parts.next() {
                follow_graph_node(app, &detail.network, node_id).await;
                return;
            }
            render::print_graph(&detail.network);
            if detail.gbiz_info.is_none() {
                println!("{}", "gBizINFO情報は見つかりませんでした。".bright_black());
            }
        }
        Err(err) => println!("{}", format!("詳細情報の取得に失敗しました: {}", err).red()),
    }
}

/// Opens the coworker profile behind a `cw:` graph node.
async fn follow_graph_node(app: &App, graph: &NetworkGraph, node_id: &str) {
    let coworker_id = graph
        .nodes
        .iter()
        .find(|n| n.id == node_id)
        .and_then(GraphNode::coworker_id);
    let Some(coworker_id) = coworker_id else {
        println!(
            "{}",
            "そのノードには社内プロフィールがありません。".bright_black()
        );
        return;
    };
    match app.client.coworker_profile(coworker_id).await {
        Ok(profile) => render::print_profile(&profile),
        Err(err) => println!("{}", format!("プロフィールの取得に失敗しました: {}", err).red()),
    }
}

async fn show_state(app: &App) {
    let Some(session_id) = app.manager.active_session_id().await else {
        println!("{}", "No active session.".bright_black());
        return;
    };
    // Prefer the snapshot already received from a flow reply; fall back
    // to fetching it directly.
    let state = match app.manager.flow_state(&session_id).await {
        Some(state) => Some(state),
        None => match app.client.session_state(&session_id).await {
            Ok(state) => {
                app.manager.set_flow_state(&session_id, state.clone()).await;
                Some(state)
            }
            Err(err) => {
                tracing::debug!("session-state fetch failed: {}", err);
                None
            }
        },
    };
    match state {
        Some(state) => render::print_flow_state(&state),
        None => println!("{}", "フロー状態はまだありません".bright_black()),
    }
}
