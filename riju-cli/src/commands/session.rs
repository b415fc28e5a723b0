//! User session commands

use crate::api::ApiClient;
use crate::output::{self, truncate, OutputFormat};
use crate::SessionCommands;
use anyhow::Result;
use riju_common::{CreateSessionRequest, LangConfig, Revisions, SessionId, UserSession};
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct SessionRow {
    session_id: String,
    pod: String,
    phase: String,
}

impl From<UserSession> for SessionRow {
    fn from(s: UserSession) -> Self {
        Self {
            session_id: s.session_id.to_string(),
            pod: truncate(&s.pod_name, 60),
            phase: s.phase.to_string(),
        }
    }
}

pub async fn handle_session_command(
    command: SessionCommands,
    api: &ApiClient,
    output_format: &str,
) -> Result<()> {
    let format = OutputFormat::parse(output_format);

    match command {
        SessionCommands::List => {
            let sessions: Vec<UserSession> = api.get("/api/sessions").await?;
            let rows: Vec<SessionRow> = sessions.into_iter().map(SessionRow::from).collect();
            output::print_output(rows, format)?;
        }

        SessionCommands::Show { id } => {
            let id = SessionId::new(id)?;
            let session: UserSession = api.get(&format!("/api/sessions/{}", id)).await?;
            output::print_single(&session, format)?;
        }

        SessionCommands::Create {
            id,
            lang,
            agent,
            ptyify,
            lang_image,
        } => {
            let request = build_request(id, lang, agent, ptyify, lang_image)?;
            let session: UserSession = api.post("/api/sessions", &request).await?;
            output::print_created("Session", &session.pod_name, session.session_id.as_str());
        }
    }

    Ok(())
}

/// Assemble and check a create request before it leaves the machine
fn build_request(
    id: String,
    lang: String,
    agent: String,
    ptyify: String,
    lang_image: String,
) -> Result<CreateSessionRequest> {
    let request = CreateSessionRequest {
        session_id: SessionId::new(id)?,
        lang_config: LangConfig::new(lang),
        revisions: Revisions {
            agent,
            ptyify,
            lang_image,
        },
    };
    request.validate()?;
    Ok(request)
}
