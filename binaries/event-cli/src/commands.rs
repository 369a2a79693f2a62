use anyhow::Result;
use events_commands::{CreateEventCommand, UpdateEventCommand};
use events_dao::EventStore;
use models_registry::Models;
use serde_json::{Value, json};
use tracing::instrument;
use user_commands::{CreateUserCommand, UpdateUserCommand};
use user_dao::UserStore;
use user_responses::UserResponse;

use crate::cli::{Commands, EventCommand, EventFields, UserCommand};

/// Executes one command and returns its JSON rendering. Absent records
/// render as `null`.
#[instrument(skip(models))]
pub async fn run<U, E>(models: &Models<U, E>, command: Commands) -> Result<Value>
where
    U: UserStore,
    E: EventStore,
{
    match command {
        Commands::User(command) => run_user(models, command).await,
        Commands::Event(command) => run_event(models, command).await,
    }
}

async fn run_user<U, E>(
    models: &Models<U, E>, command: UserCommand,
) -> Result<Value>
where
    U: UserStore,
    E: EventStore,
{
    let users = &models.users;
    let output = match command {
        UserCommand::Create {
            email,
            name,
            password,
        } => {
            let user = users
                .create(CreateUserCommand {
                    email,
                    name,
                    password,
                })
                .await?;
            serde_json::to_value(UserResponse::from(user))?
        }
        UserCommand::Get { id } => {
            serde_json::to_value(users.get(id).await?.map(UserResponse::from))?
        }
        UserCommand::GetByEmail { email } => {
            let user = users.get_by_email(&email).await?;
            serde_json::to_value(user.map(UserResponse::from))?
        }
        UserCommand::List => {
            let list: Vec<UserResponse> =
                users.list().await?.into_iter().map(Into::into).collect();
            serde_json::to_value(list)?
        }
        UserCommand::Update { id, email, name } => {
            users.update(id, UpdateUserCommand { email, name }).await?;
            json!({ "updated": id })
        }
        UserCommand::Delete { id } => {
            users.delete(id).await?;
            json!({ "deleted": id })
        }
    };

    Ok(output)
}

async fn run_event<U, E>(
    models: &Models<U, E>, command: EventCommand,
) -> Result<Value>
where
    U: UserStore,
    E: EventStore,
{
    let events = &models.events;
    let output = match command {
        EventCommand::Create { owner_id, fields } => {
            let EventFields {
                name,
                description,
                date,
                location,
            } = fields;
            let event = events
                .create(CreateEventCommand {
                    owner_id,
                    name,
                    description,
                    date,
                    location,
                })
                .await?;
            serde_json::to_value(event)?
        }
        EventCommand::Get { id } => serde_json::to_value(events.get(id).await?)?,
        EventCommand::List => serde_json::to_value(events.list().await?)?,
        EventCommand::ListByOwner { owner_id } => {
            serde_json::to_value(events.list_by_owner(owner_id).await?)?
        }
        EventCommand::Update { id, fields } => {
            let EventFields {
                name,
                description,
                date,
                location,
            } = fields;
            events
                .update(id, UpdateEventCommand {
                    name,
                    description,
                    date,
                    location,
                })
                .await?;
            json!({ "updated": id })
        }
        EventCommand::Delete { id } => {
            events.delete(id).await?;
            json!({ "deleted": id })
        }
    };

    Ok(output)
}
