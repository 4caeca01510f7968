//! Prerequisite graph
//!
//! Concepts live in an arena (`Vec<Concept>`); edges are stored as indices
//! into that arena. The graph is immutable once built and can be shared
//! across threads behind an `Arc`.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::Tier;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("concept {0} is defined more than once")]
    DuplicateConcept(String),
    #[error("concept {concept} requires unknown concept {prerequisite}")]
    UnknownPrerequisite {
        concept: String,
        prerequisite: String,
    },
    #[error("prerequisite cycle: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },
}

/// An atomic unit of knowledge in the prerequisite graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: String,
    pub tier: Tier,
    /// Direct prerequisites, in declaration order
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Study time for an average learner, in hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_hours: Option<f64>,
}

impl Concept {
    pub fn new(id: impl Into<String>, tier: Tier) -> Self {
        Self {
            id: id.into(),
            tier,
            prerequisites: Vec::new(),
            title: None,
            base_hours: None,
        }
    }

    pub fn requires(mut self, prerequisites: &[&str]) -> Self {
        self.prerequisites
            .extend(prerequisites.iter().map(|p| p.to_string()));
        self
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn hours(mut self, hours: f64) -> Self {
        self.base_hours = Some(hours);
        self
    }
}

#[derive(Debug, Clone)]
pub struct KnowledgeGraph {
    concepts: Vec<Concept>,
    edges: Vec<Vec<usize>>,
    index: HashMap<String, usize>,
}

impl KnowledgeGraph {
    pub fn builder() -> KnowledgeGraphBuilder {
        KnowledgeGraphBuilder::new()
    }

    /// Builds a graph from a concept list with the default (cycle-checking) builder.
    pub fn from_concepts(concepts: Vec<Concept>) -> Result<Self, GraphError> {
        concepts
            .into_iter()
            .fold(KnowledgeGraphBuilder::new(), KnowledgeGraphBuilder::concept)
            .build()
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Concept> {
        self.index.get(id).map(|&i| &self.concepts[i])
    }

    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter()
    }

    pub fn tier_of(&self, id: &str) -> Option<Tier> {
        self.get(id).map(|c| c.tier)
    }

    pub fn prerequisites_of(&self, id: &str) -> &[String] {
        self.get(id)
            .map(|c| c.prerequisites.as_slice())
            .unwrap_or(&[])
    }

    pub fn base_hours(&self, id: &str) -> Option<f64> {
        self.get(id).and_then(|c| c.base_hours)
    }

    /// Every concept needed to reach `targets`, each listed after all of its
    /// prerequisites, without duplicates.
    ///
    /// Targets unknown to the graph are emitted as leaves at their position.
    /// Post-order DFS over an explicit stack; the visited set is marked on push,
    /// so the walk always terminates, but on a cyclic graph the order is
    /// meaningless.
    pub fn resolve<S: AsRef<str>>(&self, targets: &[S]) -> Vec<String> {
        let mut visited = vec![false; self.concepts.len()];
        let mut unknown: HashSet<&str> = HashSet::new();
        let mut order = Vec::new();
        // (node, index of the next prerequisite to visit)
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for target in targets {
            let target = target.as_ref();
            let Some(&root) = self.index.get(target) else {
                if unknown.insert(target) {
                    order.push(target.to_string());
                }
                continue;
            };
            if visited[root] {
                continue;
            }
            visited[root] = true;
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, cursor) = *frame;
                match self.edges[node].get(cursor) {
                    Some(&next) => {
                        frame.1 += 1;
                        if !visited[next] {
                            visited[next] = true;
                            stack.push((next, 0));
                        }
                    }
                    None => {
                        stack.pop();
                        order.push(self.concepts[node].id.clone());
                    }
                }
            }
        }

        tracing::trace!(targets = targets.len(), resolved = order.len(), "resolved prerequisites");
        order
    }

    /// Returns the concepts on one prerequisite cycle (first concept repeated
    /// at the end), or `None` when the graph is acyclic.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unseen,
            Active,
            Done,
        }

        let mut marks = vec![Mark::Unseen; self.concepts.len()];
        for start in 0..self.concepts.len() {
            if marks[start] != Mark::Unseen {
                continue;
            }
            marks[start] = Mark::Active;
            let mut stack = vec![(start, 0usize)];

            while let Some(frame) = stack.last_mut() {
                let (node, cursor) = *frame;
                match self.edges[node].get(cursor) {
                    Some(&next) => {
                        frame.1 += 1;
                        match marks[next] {
                            Mark::Unseen => {
                                marks[next] = Mark::Active;
                                stack.push((next, 0));
                            }
                            Mark::Active => {
                                let from = stack.iter().position(|&(n, _)| n == next).unwrap_or(0);
                                let mut path: Vec<String> = stack[from..]
                                    .iter()
                                    .map(|&(n, _)| self.concepts[n].id.clone())
                                    .collect();
                                path.push(self.concepts[next].id.clone());
                                return Some(path);
                            }
                            Mark::Done => {}
                        }
                    }
                    None => {
                        marks[node] = Mark::Done;
                        stack.pop();
                    }
                }
            }
        }
        None
    }
}

#[derive(Debug)]
pub struct KnowledgeGraphBuilder {
    concepts: Vec<Concept>,
    verify_acyclic: bool,
}

impl Default for KnowledgeGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeGraphBuilder {
    pub fn new() -> Self {
        Self {
            concepts: Vec::new(),
            verify_acyclic: true,
        }
    }

    pub fn concept(mut self, concept: Concept) -> Self {
        self.concepts.push(concept);
        self
    }

    /// Cycle detection runs at build time unless switched off here.
    pub fn verify_acyclic(mut self, enabled: bool) -> Self {
        self.verify_acyclic = enabled;
        self
    }

    pub fn build(self) -> Result<KnowledgeGraph, GraphError> {
        let mut index = HashMap::with_capacity(self.concepts.len());
        for (i, concept) in self.concepts.iter().enumerate() {
            if index.insert(concept.id.clone(), i).is_some() {
                return Err(GraphError::DuplicateConcept(concept.id.clone()));
            }
        }

        let mut edges = Vec::with_capacity(self.concepts.len());
        for concept in &self.concepts {
            let mut targets = Vec::with_capacity(concept.prerequisites.len());
            for prerequisite in &concept.prerequisites {
                match index.get(prerequisite) {
                    Some(&j) => targets.push(j),
                    None => {
                        return Err(GraphError::UnknownPrerequisite {
                            concept: concept.id.clone(),
                            prerequisite: prerequisite.clone(),
                        })
                    }
                }
            }
            edges.push(targets);
        }

        let graph = KnowledgeGraph {
            concepts: self.concepts,
            edges,
            index,
        };

        if self.verify_acyclic {
            if let Some(path) = graph.find_cycle() {
                return Err(GraphError::Cycle { path });
            }
        }

        tracing::debug!(concepts = graph.len(), "knowledge graph built");
        Ok(graph)
    }
}
