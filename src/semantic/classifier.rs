//! Batch classifier
//!
//! Prompts are cut into fixed-size groups, one request per group. Groups run
//! on a dedicated worker pool sized to the concurrency ceiling; each result
//! comes back tagged with its group position and the merge sorts on that tag,
//! so output order always equals input order.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};

use super::prompt::{build_category_list, build_instruction};
use super::provider::{GeneratorProvider, TextGenerator};
use super::response::{match_results, parse_batch_response, parse_error_entries};
use super::types::{ClassifiedPrompt, PromptWithContext};
use crate::consts::{SEMANTIC_BATCH_SIZE, SEMANTIC_MAX_CONCURRENCY};
use crate::error::ClassifyError;

/// Observer for `(completed_prompts, total_prompts)`; may be called from
/// several worker threads.
pub(crate) type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Sync);

#[derive(Debug, Clone, Copy)]
pub(crate) struct ClassifierConfig {
    pub(crate) batch_size: usize,
    pub(crate) max_concurrency: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            batch_size: SEMANTIC_BATCH_SIZE,
            max_concurrency: SEMANTIC_MAX_CONCURRENCY,
        }
    }
}

/// Shared flag; once set, no further group request is issued.
#[derive(Debug, Clone, Default)]
pub(crate) struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub(crate) struct BatchClassifier {
    provider: Box<dyn GeneratorProvider>,
    /// Prepared once, then shared by every request
    generator: Mutex<Option<Arc<dyn TextGenerator>>>,
    config: ClassifierConfig,
    category_list: String,
}

impl BatchClassifier {
    pub(crate) fn new(provider: Box<dyn GeneratorProvider>, config: ClassifierConfig) -> Self {
        Self {
            provider,
            generator: Mutex::new(None),
            config: ClassifierConfig {
                batch_size: config.batch_size.max(1),
                max_concurrency: config.max_concurrency.max(1),
            },
            category_list: build_category_list(),
        }
    }

    fn generator(&self) -> Result<Arc<dyn TextGenerator>, ClassifyError> {
        let mut slot = self
            .generator
            .lock()
            .map_err(|_| ClassifyError::Setup("generator lock poisoned".to_string()))?;
        if let Some(generator) = slot.as_ref() {
            return Ok(Arc::clone(generator));
        }
        let generator = self.provider.prepare()?;
        *slot = Some(Arc::clone(&generator));
        Ok(generator)
    }

    /// One request. Any failure degrades the whole group to `parse_error`.
    fn classify_group(
        &self,
        generator: &dyn TextGenerator,
        position: usize,
        group: &[PromptWithContext],
    ) -> Vec<ClassifiedPrompt> {
        if group.is_empty() {
            return Vec::new();
        }
        let instruction = build_instruction(&self.category_list, group);
        let entries = match generator.generate(&instruction) {
            Ok(reply) => parse_batch_response(&reply, group.len()),
            Err(err) => {
                tracing::warn!(
                    group = position,
                    prompts = group.len(),
                    %err,
                    "classification request failed"
                );
                parse_error_entries(group.len())
            }
        };
        match_results(group, &entries)
    }

    /// Classify every item, preserving input order.
    ///
    /// Setup failure aborts before any request. Cancellation yields
    /// `ClassifyError::Cancelled` unless every group had already finished.
    pub(crate) fn classify(
        &self,
        items: &[PromptWithContext],
        progress: Option<ProgressFn<'_>>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<ClassifiedPrompt>, ClassifyError> {
        let total = items.len();
        if total == 0 {
            return Ok(Vec::new());
        }
        let is_cancelled = || cancel.is_some_and(CancellationToken::is_cancelled);
        if is_cancelled() {
            return Err(ClassifyError::Cancelled);
        }

        let generator = self.generator()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_concurrency)
            .thread_name(|i| format!("autostats-classify-{i}"))
            .build()
            .map_err(|e| ClassifyError::Setup(format!("failed to start worker pool: {e}")))?;

        let groups: Vec<&[PromptWithContext]> = items.chunks(self.config.batch_size).collect();
        let completed = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<(usize, Vec<ClassifiedPrompt>)>();

        tracing::debug!(
            prompts = total,
            groups = groups.len(),
            concurrency = self.config.max_concurrency,
            "dispatching classification groups"
        );

        pool.scope(|scope| {
            for (position, group) in groups.iter().copied().enumerate() {
                let tx = tx.clone();
                let generator = &generator;
                let completed = &completed;
                let is_cancelled = &is_cancelled;
                scope.spawn(move |_| {
                    if is_cancelled() {
                        return;
                    }
                    let results = self.classify_group(generator.as_ref(), position, group);
                    let done = completed.fetch_add(group.len(), Ordering::SeqCst) + group.len();
                    if let Some(report) = progress {
                        report(done, total);
                    }
                    // Receiver outlives the scope
                    let _ = tx.send((position, results));
                });
            }
        });
        drop(tx);

        let mut finished: Vec<(usize, Vec<ClassifiedPrompt>)> = rx.into_iter().collect();
        if finished.len() < groups.len() {
            return Err(ClassifyError::Cancelled);
        }

        finished.sort_by_key(|(position, _)| *position);
        Ok(finished
            .into_iter()
            .flat_map(|(_, results)| results)
            .collect())
    }
}
