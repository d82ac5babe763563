//! Group reflection service.
//!
//! Drives one reflection cycle over a pool of agents: gather execution
//! traces, filter them through the domain-adjusted quality gate, extract
//! domain signals, then ask the LLM for a short list of improvement
//! directives. Gather-phase store errors propagate; reflect-phase LLM
//! errors degrade to a domain-flavored single-directive fallback so a
//! flaky model never blocks the reflection cadence.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::DomainProfile;
use crate::domain::ports::{GenerationOptions, LlmClient, TraceStore};
use crate::services::domain_registry::DomainProfileRegistry;
use crate::services::quality_gate::QualityGate;
use crate::services::signal_extraction::extract_signal;

/// Marker prepended to domain-native tools in pool summaries.
const NATIVE_TOOL_MARKER: char = '★';

/// Tunables for a reflection cycle.
#[derive(Debug, Clone)]
pub struct ReflectionConfig {
    /// Cap on traces fetched per gather query
    pub max_traces_per_query: usize,
    /// Default cap on directives per cycle
    pub max_directives: usize,
    /// Generation parameters for the single LLM call
    pub llm: GenerationOptions,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            max_traces_per_query: 50,
            max_directives: 5,
            llm: GenerationOptions::default(),
        }
    }
}

/// Aggregated usage of one tool across the admitted traces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPattern {
    pub tool: String,
    pub uses: u32,
    pub successes: u32,
    /// Whether the tool is in the domain's native vocabulary
    pub domain_native: bool,
}

/// Everything gathered from a pool of agents for one reflection cycle.
#[derive(Debug, Clone)]
pub struct ExperiencePool {
    /// The category string the caller asked for
    pub category: Option<String>,
    /// The resolved domain profile
    pub profile: Arc<DomainProfile>,
    /// Distinct agents queried
    pub agent_count: usize,
    /// Traces admitted by the quality gate
    pub trace_count: usize,
    /// Traces rejected by the quality gate
    pub filtered_count: usize,
    /// Tool usage aggregated across admitted traces
    pub tool_patterns: Vec<ToolPattern>,
    /// Domain-signal excerpts pulled from task logs
    pub task_log_excerpts: Vec<String>,
    /// Patch/diff texts from admitted traces
    pub successful_patches: Vec<String>,
    /// Mid-run requirement-shift notes from admitted traces
    pub evolving_requirements: Vec<String>,
}

/// Orchestrates gather + reflect over injected collaborators.
///
/// The LLM client and trace store are constructor parameters so tests can
/// substitute deterministic stubs. The registry is shared read-mostly
/// state; writes happen only through `register_domain`.
pub struct GroupReflectionService {
    trace_store: Arc<dyn TraceStore>,
    llm: Arc<dyn LlmClient>,
    registry: Arc<RwLock<DomainProfileRegistry>>,
    gate: QualityGate,
    config: ReflectionConfig,
}

impl GroupReflectionService {
    pub fn new(trace_store: Arc<dyn TraceStore>, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            trace_store,
            llm,
            registry: Arc::new(RwLock::new(DomainProfileRegistry::builtin())),
            gate: QualityGate::default(),
            config: ReflectionConfig::default(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<RwLock<DomainProfileRegistry>>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_gate(mut self, gate: QualityGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_config(mut self, config: ReflectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Handle to the shared registry (e.g. for diagnostics).
    pub fn registry(&self) -> Arc<RwLock<DomainProfileRegistry>> {
        self.registry.clone()
    }

    /// Register or overwrite a domain profile for subsequent resolves on
    /// this service's registry (and any service sharing it).
    pub async fn register_domain(&self, name: &str, profile: DomainProfile) -> DomainResult<()> {
        self.registry.write().await.register(name, profile)
    }

    /// Gather the experience pool for a set of agents in one category.
    ///
    /// Store errors propagate: reflection for this cycle simply does not
    /// run. Malformed traces fail fast with a validation error.
    pub async fn gather_group_experience_pool(
        &self,
        agent_ids: &[String],
        category: Option<&str>,
    ) -> DomainResult<ExperiencePool> {
        let profile = self.registry.read().await.resolve(category);

        let traces = self
            .trace_store
            .traces_for_agents(agent_ids, self.config.max_traces_per_query)
            .await?;

        let mut pool = ExperiencePool {
            category: category.map(ToString::to_string),
            profile: profile.clone(),
            agent_count: agent_ids.iter().collect::<BTreeSet<_>>().len(),
            trace_count: 0,
            filtered_count: 0,
            tool_patterns: Vec::new(),
            task_log_excerpts: Vec::new(),
            successful_patches: Vec::new(),
            evolving_requirements: Vec::new(),
        };

        let mut tool_counts: BTreeMap<String, (u32, u32)> = BTreeMap::new();

        for trace in &traces {
            trace.validate().map_err(DomainError::ValidationFailed)?;

            if !self.gate.admits(trace, &profile) {
                pool.filtered_count += 1;
                continue;
            }
            pool.trace_count += 1;

            if let Some(excerpt) = extract_signal(&trace.task_log, &profile) {
                pool.task_log_excerpts.push(excerpt);
            }
            for tool_use in &trace.tool_uses {
                let entry = tool_counts.entry(tool_use.tool.clone()).or_insert((0, 0));
                entry.0 += 1;
                if tool_use.success {
                    entry.1 += 1;
                }
            }
            if let Some(patch) = &trace.patch {
                pool.successful_patches.push(patch.clone());
            }
            if let Some(notes) = &trace.evolving_requirements {
                pool.evolving_requirements.push(notes.clone());
            }
        }

        pool.tool_patterns = tool_counts
            .into_iter()
            .map(|(tool, (uses, successes))| ToolPattern {
                domain_native: profile.is_native_tool(&tool),
                tool,
                uses,
                successes,
            })
            .collect();

        tracing::info!(
            domain = %profile.name,
            agents = pool.agent_count,
            admitted = pool.trace_count,
            filtered = pool.filtered_count,
            "gathered group experience pool"
        );
        if pool.filtered_count > 0 {
            tracing::warn!(
                domain = %profile.name,
                filtered = pool.filtered_count,
                threshold = self.gate.effective_threshold(&profile),
                "quality gate rejected traces"
            );
        }

        Ok(pool)
    }

    /// Turn a gathered pool into improvement directives.
    ///
    /// Always returns a non-empty list and never an error: an empty pool
    /// yields a bootstrap directive with no LLM call, and any LLM failure
    /// (including a response that parses to nothing) yields a single
    /// domain-flavored fallback directive. Retry policy belongs to the
    /// caller.
    pub async fn reflect_and_generate_directives(
        &self,
        pool: &ExperiencePool,
        max_directives: usize,
    ) -> Vec<String> {
        let profile = &pool.profile;

        if pool.trace_count == 0 {
            tracing::info!(domain = %profile.name, "empty pool, emitting bootstrap directive");
            return vec![format!(
                "No qualifying experience in the {} pool yet. Capture more runs that demonstrate {} before the next reflection cycle.",
                profile.name, profile.success_term
            )];
        }

        let system_prompt = build_system_prompt(profile, max_directives);
        let user_prompt = build_user_prompt(pool, max_directives);

        let call = self
            .llm
            .generate(&system_prompt, &user_prompt, &self.config.llm);
        let outcome =
            tokio::time::timeout(Duration::from_secs(self.config.llm.timeout_secs), call).await;

        let response = match outcome {
            Ok(Ok(text)) => text,
            Ok(Err(err)) => {
                tracing::warn!(
                    domain = %profile.name,
                    error = %err,
                    "LLM call failed, using fallback directive"
                );
                return vec![fallback_directive(profile)];
            }
            Err(_) => {
                tracing::warn!(
                    domain = %profile.name,
                    timeout_secs = self.config.llm.timeout_secs,
                    "LLM call timed out, using fallback directive"
                );
                return vec![fallback_directive(profile)];
            }
        };

        let directives = parse_directives(&response, max_directives);
        if directives.is_empty() {
            tracing::warn!(
                domain = %profile.name,
                "LLM response contained no directives, using fallback"
            );
            return vec![fallback_directive(profile)];
        }

        tracing::info!(
            domain = %profile.name,
            count = directives.len(),
            "generated reflection directives"
        );
        directives
    }
}

/// Single-directive fallback naming the domain's failure vocabulary.
fn fallback_directive(profile: &DomainProfile) -> String {
    format!(
        "Reflection was skipped this cycle for the {} pool. Manually review recent {} until the next cycle completes.",
        profile.name, profile.failure_term
    )
}

fn build_system_prompt(profile: &DomainProfile, max_directives: usize) -> String {
    let mut prompt = format!(
        "You are the group reflection engine for the {} domain.",
        profile.name
    );
    if !profile.prompt_preamble.is_empty() {
        prompt.push(' ');
        prompt.push_str(&profile.prompt_preamble);
    }
    prompt.push_str(&format!(
        " Respond with a numbered list of at most {max_directives} concrete improvement directives and nothing else."
    ));
    prompt
}

fn build_user_prompt(pool: &ExperiencePool, max_directives: usize) -> String {
    let profile = &pool.profile;
    let mut prompt = format!(
        "Experience pool: {} agents, {} qualifying traces ({} filtered by the quality gate).\n",
        pool.agent_count, pool.trace_count, pool.filtered_count
    );

    if !pool.tool_patterns.is_empty() {
        prompt.push_str("\nTool usage patterns:\n");
        for pattern in &pool.tool_patterns {
            let marker = if pattern.domain_native {
                format!("{NATIVE_TOOL_MARKER} ")
            } else {
                String::new()
            };
            prompt.push_str(&format!(
                "- {}{}: {} uses, {} successful\n",
                marker, pattern.tool, pattern.uses, pattern.successes
            ));
        }
    }

    if !pool.task_log_excerpts.is_empty() {
        prompt.push_str("\nLog excerpts:\n");
        for excerpt in &pool.task_log_excerpts {
            prompt.push_str(&format!("---\n{excerpt}\n"));
        }
    }

    if !pool.successful_patches.is_empty() {
        prompt.push_str(&format!("\nRecent {} examples:\n", profile.patch_label));
        for patch in &pool.successful_patches {
            prompt.push_str(&format!("---\n{patch}\n"));
        }
    }

    if !pool.evolving_requirements.is_empty() {
        prompt.push_str("\nEvolving requirements noted mid-run:\n");
        for note in &pool.evolving_requirements {
            prompt.push_str(&format!("- {note}\n"));
        }
    }

    prompt.push_str(&format!(
        "\nProduce at most {max_directives} numbered improvement directives for this group of agents."
    ));
    prompt
}

/// Parse a numbered or bulleted list into directive strings.
///
/// Accepts `1.`, `1)`, `-`, `*` and `•` markers; unmarked lines are
/// ignored so prose framing around the list does not leak into directives.
fn parse_directives(response: &str, max_directives: usize) -> Vec<String> {
    response
        .lines()
        .filter_map(strip_list_marker)
        .take(max_directives)
        .collect()
}

fn strip_list_marker(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let after_digits = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    if after_digits.len() < trimmed.len() {
        let content = after_digits.strip_prefix(['.', ')'])?.trim();
        return (!content.is_empty()).then(|| content.to_string());
    }

    let content = trimmed.strip_prefix(['-', '*', '•'])?.trim();
    (!content.is_empty()).then(|| content.to_string())
}
