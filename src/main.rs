//! `eslreview` 바이너리 진입점.

use eslreview::domain::session::{GenerateOptions, SessionState};
use eslreview::infrastructure::render::{render_prompt, render_review};
use eslreview::interface::cli::{AppComposition, Cli, CliAction, run_repl};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let action = Cli::parse_action();
    let composition = AppComposition::default();

    let outcome = match action {
        CliAction::Interactive => run_repl(&composition).await,
        CliAction::InspectConfig => composition
            .inspect_config_usecase()
            .execute()
            .map(|json| println!("{json}")),
        CliAction::Generate(options) => generate_once(&composition, options).await,
    };

    if let Err(err) = outcome {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn generate_once(
    composition: &AppComposition,
    options: GenerateOptions,
) -> anyhow::Result<()> {
    let usecase = composition.generate_usecase();
    if options.dry_run {
        let request = options.form.to_request()?;
        print!("{}", render_prompt(&usecase.preview(&request)?));
        return Ok(());
    }

    let state = SessionState {
        form: options.form,
        ..SessionState::default()
    };
    let (state, outcome) = usecase.execute_in_session(state).await;
    outcome?;
    if let Some(review) = &state.result {
        print!("{}", render_review(review));
    }
    Ok(())
}
