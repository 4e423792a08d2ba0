//! CLI 명령 파싱 모듈.

use clap::{Args, Parser, Subcommand};

use crate::domain::review::ReviewType;
use crate::domain::session::{FormState, GenerateOptions};

#[derive(Debug, Parser)]
#[command(name = "eslreview")]
#[command(about = "Simple-English lesson reviews for one-on-one ESL classes")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate one review and print it
    Generate(GenerateArgs),
    /// Show effective merged config and API key resolution
    Config,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Review format: ids, g-review or s-review
    #[arg(long = "type", short = 't', default_value = "ids", value_parser = parse_review_type)]
    review_type: ReviewType,

    /// Student name (required for ids and s-review)
    #[arg(long, short = 'n', default_value = "")]
    name: String,

    /// Lesson topic
    #[arg(long, default_value = "")]
    topic: String,

    /// Phonics and key words, e.g. "-ad: dad, mad, sad"
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    phonics: String,

    /// Class notes or transcript
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    notes: String,

    /// Student focus rating
    #[arg(long, short = 'f', default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=5))]
    focus: u8,

    /// Print the composed prompt, do not call the API
    #[arg(long)]
    dry_run: bool,
}

pub enum CliAction {
    Interactive,
    InspectConfig,
    Generate(GenerateOptions),
}

impl Cli {
    /// 인자를 파싱한다. 잘못된 인자/`--help`는 clap이 출력 후 종료한다.
    pub fn parse_action() -> CliAction {
        Cli::parse().into_action()
    }

    fn into_action(self) -> CliAction {
        match self.command {
            None => CliAction::Interactive,
            Some(Commands::Config) => CliAction::InspectConfig,
            Some(Commands::Generate(args)) => CliAction::Generate(GenerateOptions {
                form: FormState {
                    review_type: args.review_type,
                    student_name: args.name,
                    lesson_topic: args.topic,
                    phonics_info: args.phonics,
                    session_notes: args.notes,
                    focus_rating: args.focus,
                },
                dry_run: args.dry_run,
            }),
        }
    }
}

fn parse_review_type(raw: &str) -> Result<ReviewType, String> {
    raw.parse::<ReviewType>().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(args: &[&str]) -> Result<CliAction, String> {
        Cli::try_parse_from(args)
            .map(Cli::into_action)
            .map_err(|err| err.to_string())
    }

    #[test]
    fn no_arguments_opens_repl() {
        assert!(matches!(action(&["eslreview"]), Ok(CliAction::Interactive)));
    }

    #[test]
    fn config_subcommand() {
        assert!(matches!(
            action(&["eslreview", "config"]),
            Ok(CliAction::InspectConfig)
        ));
    }

    #[test]
    fn generate_maps_flags_to_form() {
        let Ok(CliAction::Generate(options)) = action(&[
            "eslreview",
            "generate",
            "--type",
            "s-review",
            "--name",
            "Madison",
            "--topic",
            "Daily Routines",
            "--phonics",
            "-ad: dad, mad, sad",
            "--focus",
            "4",
            "--dry-run",
        ]) else {
            panic!("expected generate action");
        };

        assert!(options.dry_run);
        assert_eq!(options.form.review_type, ReviewType::SpecificReview);
        assert_eq!(options.form.student_name, "Madison");
        assert_eq!(options.form.phonics_info, "-ad: dad, mad, sad");
        assert_eq!(options.form.focus_rating, 4);
    }

    #[test]
    fn generate_defaults_to_detailed_summary_full_focus() {
        let Ok(CliAction::Generate(options)) = action(&["eslreview", "generate", "-n", "Leo"])
        else {
            panic!("expected generate action");
        };
        assert_eq!(options.form.review_type, ReviewType::IndividualDetailedSummary);
        assert_eq!(options.form.focus_rating, 5);
        assert!(!options.dry_run);
    }

    #[test]
    fn focus_outside_range_is_rejected() {
        assert!(action(&["eslreview", "generate", "--focus", "0"]).is_err());
        assert!(action(&["eslreview", "generate", "--focus", "6"]).is_err());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = action(&["eslreview", "generate", "--type", "weekly"])
            .err()
            .expect("invalid type");
        assert!(err.contains("unknown review type"));
    }
}
