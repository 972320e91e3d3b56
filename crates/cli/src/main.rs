use clap::{Parser, Subcommand, ValueEnum};
use cdx_core::pb::{self, NotificationPriority};
use cdx_core::{core_config_from_lookup, Actor, CdxServices, ListQuery};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cdx")]
#[command(about = "CDX health data platform CLI")]
struct Cli {
    /// Acting user recorded in the audit trail
    #[arg(long, global = true, env = "CDX_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patient profiles
    ListProfiles,
    /// Create a patient profile
    CreateProfile {
        /// First name
        first_name: String,
        /// Last name
        last_name: String,
        /// National health id (must be unique)
        national_health_id: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        date_of_birth: Option<String>,
        /// Contact email
        #[arg(long)]
        email: Option<String>,
    },
    /// Export a patient's medical record as JSON
    ExportRecord {
        /// Profile id of the patient
        patient_id: String,
    },
    /// Show the audit trail for a patient
    Audit {
        /// Profile id of the patient
        patient_id: String,
    },
    /// Deliver pending notifications
    ProcessNotifications {
        /// Only process notifications of this priority
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Priority {
    Low,
    Medium,
    High,
    Immediate,
}

impl From<Priority> for NotificationPriority {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Low => NotificationPriority::Low,
            Priority::Medium => NotificationPriority::Medium,
            Priority::High => NotificationPriority::High,
            Priority::Immediate => NotificationPriority::Immediate,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("cdx=warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'cdx --help' for commands");
        return Ok(());
    };

    let cfg = core_config_from_lookup(|name| std::env::var(name).ok())?;
    let services = CdxServices::open(&cfg)?;
    let actor = Actor::from_header(cli.user.as_deref());

    match command {
        Commands::ListProfiles => {
            let profiles = services.profiles.list(&ListQuery::default())?.items;
            if profiles.is_empty() {
                println!("No profiles found.");
            } else {
                for profile in profiles {
                    println!(
                        "ID: {}, Name: {} {}, NHID: {}, Created: {}",
                        profile.id,
                        profile.first_name,
                        profile.last_name,
                        profile.national_health_id,
                        profile.created_at
                    );
                }
            }
        }
        Commands::CreateProfile {
            first_name,
            last_name,
            national_health_id,
            date_of_birth,
            email,
        } => {
            let profile = services.profiles.create(
                &actor,
                pb::Profile {
                    first_name,
                    last_name,
                    national_health_id,
                    date_of_birth: date_of_birth.unwrap_or_default(),
                    email: email.unwrap_or_default(),
                    active: true,
                    ..Default::default()
                },
            )?;
            println!("Created profile with ID: {}", profile.id);
        }
        Commands::ExportRecord { patient_id } => {
            let record = services
                .medical_records
                .request_export(&actor, &patient_id)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Audit { patient_id } => {
            let events = services.audit.events_for_patient(&patient_id)?;
            if events.is_empty() {
                println!("No audit events for {patient_id}.");
            }
            for event in events {
                println!(
                    "{} {:?} by {}: {} ({})",
                    event.created_at, event.event_type, event.actor, event.description, event.resource
                );
            }
        }
        Commands::ProcessNotifications { priority } => {
            let priority = priority
                .map(NotificationPriority::from)
                .unwrap_or(NotificationPriority::Unspecified);
            let summary = services
                .notifications
                .process_pending(&actor, priority)
                .await?;
            println!(
                "Processed {}, sent {}, failed {}",
                summary.processed, summary.sent, summary.failed
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_profile_with_options() {
        let cli = Cli::try_parse_from([
            "cdx",
            "create-profile",
            "Jane",
            "Doe",
            "NH-1",
            "--date-of-birth",
            "1990-04-01",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::CreateProfile {
                first_name,
                national_health_id,
                date_of_birth,
                email,
                ..
            }) => {
                assert_eq!(first_name, "Jane");
                assert_eq!(national_health_id, "NH-1");
                assert_eq!(date_of_birth.as_deref(), Some("1990-04-01"));
                assert!(email.is_none());
            }
            _ => panic!("expected create-profile"),
        }
    }

    #[test]
    fn test_parse_process_notifications_priority() {
        let cli =
            Cli::try_parse_from(["cdx", "process-notifications", "--priority", "immediate"]).unwrap();
        match cli.command {
            Some(Commands::ProcessNotifications { priority: Some(p) }) => {
                assert_eq!(NotificationPriority::from(p), NotificationPriority::Immediate);
            }
            _ => panic!("expected process-notifications with a priority"),
        }

        assert!(Cli::try_parse_from(["cdx", "process-notifications", "--priority", "urgent"]).is_err());
    }

    #[test]
    fn test_user_flag_is_global() {
        let cli = Cli::try_parse_from(["cdx", "audit", "abc", "--user", "dr-who"]).unwrap();
        assert_eq!(cli.user.as_deref(), Some("dr-who"));
    }
}
