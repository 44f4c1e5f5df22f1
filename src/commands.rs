//! Admin console and submissions commands run from the CLI

use anyhow::Result;
use serde_json::Value;

use crate::{
    config::{
        ActionCommand, AdminArgs, AdminCommand, LayoutCommand, SubmissionFields, SubmissionsArgs,
        SubmissionsCommand, TeamCommand, TimerCommand,
    },
    services::{
        admin::NoteSettings, submissions::group_by_team, AdminConsole, AuthRealm, BackendClient,
        Submission, SubmissionForm,
    },
    state::{timer_state, RecordId},
};

impl From<SubmissionFields> for SubmissionForm {
    fn from(fields: SubmissionFields) -> Self {
        Self {
            team_name: fields.team,
            project_name: fields.project,
            project_description: fields.description,
            github_link: fields.github,
        }
    }
}

/// Run one admin console command
pub async fn run_admin(client: BackendClient, args: AdminArgs) -> Result<()> {
    let console = AdminConsole::login(client, &args.email, &args.password).await?;

    match args.command {
        AdminCommand::Timer(command) => run_timer(&console, command).await?,
        AdminCommand::Note(note) => {
            let bold = note.bold();
            console
                .set_note(NoteSettings {
                    text: note.text,
                    font_size: note.font_size,
                    glow_color: note.glow_color,
                    glow_intensity: note.glow_intensity,
                    bold,
                })
                .await?;
            println!("Note updated");
        }
        AdminCommand::Team(command) => run_team(&console, command).await?,
        AdminCommand::Action(ActionCommand::Sound { url }) => {
            console.play_sound(&url).await?;
            println!("Sound sent");
        }
        AdminCommand::Action(ActionCommand::Tts { text }) => {
            console.speak(&text).await?;
            println!("Message sent");
        }
        AdminCommand::Layout(LayoutCommand::Preset { name }) => {
            console.apply_layout_preset(&name).await?;
            println!("Layout '{}' saved", name);
        }
        AdminCommand::Layout(LayoutCommand::Show) => {
            let config = console.config().await?;
            match config.layout {
                Some(layout) => println!("{}", serde_json::to_string_pretty(&layout)?),
                None => println!("No layout saved; the display uses its default preset"),
            }
        }
        AdminCommand::Shuffle(shuffle) => {
            let enabled = shuffle.mode == "on";
            console.set_shuffle(enabled, shuffle.interval).await?;
            println!("Shuffle {}", if enabled { "enabled" } else { "disabled" });
        }
        AdminCommand::Audit => {
            for entry in console.audit_log().await? {
                let when = entry
                    .created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{}  {:<20} {:<18} {}", when, entry.admin_username, entry.action_type, entry.details);
            }
        }
        AdminCommand::Status => {
            let status = console.status().await?;
            match status.email {
                Some(email) if status.logged_in => println!("Logged in as {}", email),
                _ => println!("Not logged in"),
            }
        }
        AdminCommand::Logout => {
            console.logout().await?;
            println!("Logged out");
        }
    }

    Ok(())
}

async fn run_timer(console: &AdminConsole, command: TimerCommand) -> Result<()> {
    match command {
        TimerCommand::Set { seconds } => {
            console.set_timer(seconds).await?;
            println!("Timer set to {}", timer_state::format_hms(seconds));
        }
        TimerCommand::Start => {
            console.start_timer().await?;
            println!("Timer started");
        }
        TimerCommand::Pause => {
            console.pause_timer().await?;
            println!("Timer paused");
        }
        TimerCommand::Reset => {
            console.reset_timer().await?;
            println!("Timer reset");
        }
        TimerCommand::Style { font_size, color } => {
            console.set_timer_style(font_size, color).await?;
            println!("Timer style updated");
        }
    }
    Ok(())
}

async fn run_team(console: &AdminConsole, command: TeamCommand) -> Result<()> {
    match command {
        TeamCommand::List => {
            for team in console.teams().await? {
                let shown = if team.visible { "shown " } else { "hidden" };
                println!("{:>6}  {}  {}", team.id.to_string(), shown, team.name);
            }
        }
        TeamCommand::Add { name } => {
            console.add_team(&name).await?;
            println!("Team '{}' added", name.trim());
        }
        TeamCommand::Remove { id } => {
            console.remove_team(&RecordId::from(id.as_str())).await?;
            println!("Team {} deleted", id);
        }
        TeamCommand::Show { id } => {
            console.set_team_visible(&RecordId::from(id.as_str()), true).await?;
            println!("Team {} shown", id);
        }
        TeamCommand::Hide { id } => {
            console.set_team_visible(&RecordId::from(id.as_str()), false).await?;
            println!("Team {} hidden", id);
        }
    }
    Ok(())
}

/// Submit a project (no login needed)
pub async fn run_submit(client: BackendClient, fields: SubmissionFields) -> Result<()> {
    let form = SubmissionForm::from(fields).validated()?;
    let created: Value = client.create_submission(&form).await?;
    println!("Project submitted successfully!");
    if !created.is_null() {
        println!("{}", serde_json::to_string_pretty(&created)?);
    }
    Ok(())
}

/// Run one submissions management command
pub async fn run_submissions(client: BackendClient, args: SubmissionsArgs) -> Result<()> {
    client.login(AuthRealm::Submissions, &args.email, &args.password).await?;

    match args.command {
        SubmissionsCommand::List => {
            let submissions = client.list_submissions().await?;
            if submissions.is_empty() {
                println!("No submissions yet");
            }
            for (team, projects) in group_by_team(submissions) {
                println!("{}", team);
                for (index, submission) in projects.iter().enumerate() {
                    println!("  {}. {}", index + 1, describe(submission));
                }
            }
        }
        SubmissionsCommand::Get { id } => {
            let submission = client.get_submission(&RecordId::from(id.as_str())).await?;
            println!("{}", serde_json::to_string_pretty(&submission)?);
        }
        SubmissionsCommand::Edit { id, fields } => {
            let form = SubmissionForm::from(fields).validated()?;
            client.update_submission(&RecordId::from(id.as_str()), &form).await?;
            println!("Submission updated successfully");
        }
        SubmissionsCommand::Delete { id } => {
            client.delete_submission(&RecordId::from(id.as_str())).await?;
            println!("Submission deleted successfully");
        }
    }

    client.logout(AuthRealm::Submissions).await?;
    Ok(())
}

fn describe(submission: &Submission) -> String {
    let when = submission
        .created_at
        .map(|t| t.format(" (%b %-d, %Y %H:%M)").to_string())
        .unwrap_or_default();
    format!(
        "{} [{}]{}\n     {}\n     {}",
        submission.project_name,
        submission.id,
        when,
        submission.project_description,
        submission.github_link
    )
}
