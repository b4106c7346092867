use std::time::Instant;

use crate::cli::Cli;
use crate::core::{ExtractedPrompt, TimeScope, calculate_metrics, calculate_overlap_metrics};
use crate::error::{AppError, ClassifyError};
use crate::output::{Report, output_json, print_summary};
use crate::semantic::types::ClassifiedPrompt;
use crate::semantic::{
    AnthropicProvider, BatchClassifier, CancellationToken, add_context_to_prompts,
    calculate_semantic_metrics,
};
use crate::source::{LoadResult, SessionFilter, load_sessions, resolve_projects_dir};

/// Exit status for a failed run: 130 after Ctrl-C, 1 otherwise
pub(crate) fn exit_code(err: &AppError) -> i32 {
    match err {
        AppError::Classify(ClassifyError::Cancelled) => 130,
        _ => 1,
    }
}

fn classify_prompts(
    cli: &Cli,
    prompts: &[ExtractedPrompt],
    quiet: bool,
) -> Result<Vec<ClassifiedPrompt>, ClassifyError> {
    if prompts.is_empty() {
        return Ok(Vec::new());
    }

    let items = add_context_to_prompts(prompts, cli.context_window());
    let provider = AnthropicProvider::new(cli.provider_settings());
    let classifier = BatchClassifier::new(Box::new(provider), cli.classifier_config());

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(err) = ctrlc::set_handler(move || handler_token.cancel()) {
        tracing::warn!(%err, "failed to install Ctrl-C handler");
    }

    if !quiet {
        eprintln!("Classifying {} prompts...", items.len());
    }
    let progress = |done: usize, total: usize| {
        if !quiet {
            eprint!("\r  {done}/{total} prompts classified");
        }
    };

    let result = classifier.classify(&items, Some(&progress), Some(&cancel));
    if !quiet {
        eprintln!();
    }
    result
}

/// One full run: resolve scope, read logs, analyze, print
pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    let start = Instant::now();
    // Scope errors surface before any log is read
    let scope = TimeScope::resolve(&cli.time_scope, cli.timezone())?;
    let quiet = cli.json;

    let filter = SessionFilter {
        exclude_projects: cli.exclude_projects.clone(),
        include_sub_sessions: cli.include_sub_sessions,
    };
    let loaded = match resolve_projects_dir(cli.sessions_path.as_deref()) {
        Some(root) => load_sessions(&root, &filter, &scope, quiet),
        None => {
            tracing::warn!("could not determine the projects directory");
            LoadResult::default()
        }
    };

    let autonomy = calculate_metrics(
        &loaded.autonomy.periods,
        loaded.autonomy.total_prompts_sent,
    );
    let overlap = calculate_overlap_metrics(&loaded.autonomy.periods);

    let semantic_requested = cli.semantic_enabled();
    let semantic = if semantic_requested {
        let classified = classify_prompts(cli, &loaded.prompts, quiet)?;
        calculate_semantic_metrics(&classified)
    } else {
        None
    };

    let report = Report {
        scope_expr: &cli.time_scope,
        scope: &scope,
        sessions_scanned: loaded.sessions_scanned,
        total_prompts_sent: loaded.autonomy.total_prompts_sent,
        autonomy: autonomy.as_ref(),
        overlap,
        semantic_requested,
        semantic: semantic.as_ref(),
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    };

    if cli.json {
        println!("{}", output_json(&report));
    } else {
        print_summary(&report, cli.use_color());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_exits_130() {
        assert_eq!(exit_code(&ClassifyError::Cancelled.into()), 130);
        assert_eq!(
            exit_code(&ClassifyError::Setup("no key".to_string()).into()),
            1
        );
        assert_eq!(exit_code(&AppError::invalid_scope("x", "bad")), 1);
    }
}
