//! Request resolution: key derivation, cache lookup, computation, store.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use kuvend_cache::{serialized_size, CacheStats, CacheStore, CacheValue, EntrySummary, KeyDeriver};
use kuvend_core::{Endpoint, KuvendError, PersonaKey, PipelineResult, Result};
use kuvend_i18n::Language;
use kuvend_prompt::{DebateEngine, ReasoningCycle};

use crate::config::KuvendConfig;
use crate::llms::Generator;
use crate::singleflight::SingleFlight;

/// One orchestrated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub endpoint: Endpoint,
    #[serde(default)]
    pub personas: Vec<PersonaKey>,
    pub prompt: String,
    #[serde(default)]
    pub mode: Option<String>,
}

impl ResolveRequest {
    pub fn new(endpoint: Endpoint, prompt: impl Into<String>) -> Self {
        Self {
            endpoint,
            personas: Vec::new(),
            prompt: prompt.into(),
            mode: None,
        }
    }

    pub fn with_personas(mut self, personas: impl IntoIterator<Item = PersonaKey>) -> Self {
        self.personas = personas.into_iter().collect();
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }
}

/// The artifact produced for an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResolvedValue {
    Cycle(PipelineResult),
    Debate(BTreeMap<PersonaKey, String>),
    Combined {
        cycle: PipelineResult,
        debate: BTreeMap<PersonaKey, String>,
    },
    Generated(String),
}

impl CacheValue for ResolvedValue {
    fn approx_size(&self) -> usize {
        serialized_size(self)
    }
}

/// A resolved value with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub value: ResolvedValue,
    pub served_from_cache: bool,
    pub key: String,
}

pub struct Orchestrator {
    store: Arc<CacheStore<ResolvedValue>>,
    keys: KeyDeriver,
    cycle: ReasoningCycle,
    debate: DebateEngine,
    generator: Arc<dyn Generator>,
    flights: SingleFlight<ResolvedValue>,
}

impl Orchestrator {
    pub fn new(language: Language, generator: Arc<dyn Generator>) -> Self {
        Self::with_parts(Arc::new(CacheStore::new()), KeyDeriver::default(), language, generator)
    }

    pub fn with_parts(
        store: Arc<CacheStore<ResolvedValue>>,
        keys: KeyDeriver,
        language: Language,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            store,
            keys,
            cycle: ReasoningCycle::new(language),
            debate: DebateEngine::new(language),
            generator,
            flights: SingleFlight::new(),
        }
    }

    pub fn from_config(config: &KuvendConfig, generator: Arc<dyn Generator>) -> Self {
        let store = CacheStore::with_default_ttl(config.cache.default_ttl());
        if !config.cache.enabled {
            store.disable();
        }

        Self::with_parts(
            Arc::new(store),
            config.cache.to_key_deriver(),
            config.pipeline.language(),
            generator,
        )
    }

    /// Shared handle to the underlying store, e.g. for a periodic sweeper.
    pub fn store(&self) -> &Arc<CacheStore<ResolvedValue>> {
        &self.store
    }

    pub fn language(&self) -> Language {
        self.cycle.language()
    }

    /// Serve `request` from the cache, or compute, store and return it.
    ///
    /// Only `generate` misses are coalesced; the in-process endpoints are
    /// cheap enough that concurrent misses simply both compute and the last
    /// `set` wins. Failures are never cached.
    pub async fn resolve(&self, request: &ResolveRequest) -> Result<Resolution> {
        if request.prompt.trim().is_empty() {
            return Err(KuvendError::invalid_input("prompt must not be empty"));
        }
        if request.endpoint == Endpoint::Generate && request.personas.is_empty() {
            return Err(KuvendError::invalid_input(
                "generate requires at least one persona",
            ));
        }

        let key = self.keys.derive(
            request.endpoint,
            &request.personas,
            &request.prompt,
            request.mode.as_deref(),
        );

        if let Some(value) = self.store.get(&key) {
            return Ok(Resolution {
                value,
                served_from_cache: true,
                key,
            });
        }

        let value = match request.endpoint {
            Endpoint::Generate => self.generate(&key, request).await?,
            _ => {
                let value = self.compute_local(request)?;
                self.store.set(key.clone(), value.clone(), None);
                value
            }
        };

        Ok(Resolution {
            value,
            served_from_cache: false,
            key,
        })
    }

    fn compute_local(&self, request: &ResolveRequest) -> Result<ResolvedValue> {
        let prompt = request.prompt.as_str();
        let value = match request.endpoint {
            Endpoint::Cycle => ResolvedValue::Cycle(self.cycle.run(prompt)?),
            Endpoint::Debate => {
                ResolvedValue::Debate(self.debate.debate_subset(prompt, &request.personas)?)
            }
            Endpoint::Combined => ResolvedValue::Combined {
                cycle: self.cycle.run(prompt)?,
                debate: self.debate.debate_subset(prompt, &request.personas)?,
            },
            Endpoint::Generate => {
                return Err(KuvendError::invalid_input(
                    "generate is not computed in-process",
                ))
            }
        };
        Ok(value)
    }

    async fn generate(&self, key: &str, request: &ResolveRequest) -> Result<ResolvedValue> {
        self.flights
            .run(key, || async {
                // A flight that settled between our miss and joining has
                // already stored its value.
                if let Some(value) = self.store.peek(key) {
                    return Ok(value);
                }

                log::debug!("Delegating {} to the generator", key);
                let text = self
                    .generator
                    .generate(&request.prompt, &request.personas, request.mode.as_deref())
                    .await?;

                let value = ResolvedValue::Generated(text);
                self.store.set(key, value.clone(), None);
                Ok(value)
            })
            .await
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    pub fn list_entries(&self) -> Vec<EntrySummary> {
        self.store.list_entries()
    }

    pub fn clear(&self) {
        self.store.clear()
    }

    pub fn cleanup(&self) -> usize {
        self.store.cleanup()
    }

    pub fn set_default_ttl(&self, ttl: Duration) -> bool {
        self.store.set_default_ttl(ttl)
    }

    /// Flush the cache. The store holds nothing worth persisting.
    pub fn shutdown(&self) {
        let dropped = self.store.entry_count();
        self.store.clear();
        log::info!("Orchestrator shut down, dropped {} cached entries", dropped);
    }
}
