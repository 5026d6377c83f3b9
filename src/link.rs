//! Declarative join graph between collections.
//!
//! A [`LinkGraph`] is built once at startup and shared read-only. Each [`ModelLink`]
//! names the entity schema and backing collection of one node; each of its
//! [`FieldLink`]s attaches the matching records of another node under
//! `resolved_name`. Nodes refer to each other by model name so that a graph
//! accidentally wired into a loop is detectable instead of recursing forever.

use std::collections::HashMap;

use crate::errors::QueryError;
use crate::schema::{Entity, Schema};

/// Reserved primary-key name on the document store side.
pub const BACKEND_ID: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Local field holds a list of ids; attaches every matching child.
    Array,
    /// Local field holds one id; attaches the single matching child.
    Single,
    /// Like `Single`, but among several matches keeps the one with the greatest primary key.
    SingleLast,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldLink {
    /// Local key; empty means the primary key.
    pub id_name: String,
    /// Child's foreign key; empty means the child's primary key.
    pub link_id_name: String,
    /// Field the joined records are attached under. Unique among siblings.
    pub resolved_name: String,
    pub kind: LinkKind,
    /// Model name of the child node in the graph.
    pub target: String,
}

impl FieldLink {
    #[must_use]
    pub fn new(kind: LinkKind, resolved_name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id_name: String::new(),
            link_id_name: String::new(),
            resolved_name: resolved_name.into(),
            kind,
            target: target.into(),
        }
    }

    #[must_use]
    pub fn array(resolved_name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(LinkKind::Array, resolved_name, target)
    }

    #[must_use]
    pub fn single(resolved_name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(LinkKind::Single, resolved_name, target)
    }

    #[must_use]
    pub fn single_last(resolved_name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(LinkKind::SingleLast, resolved_name, target)
    }

    #[must_use]
    pub fn id_name(mut self, name: impl Into<String>) -> Self {
        self.id_name = name.into();
        self
    }

    #[must_use]
    pub fn link_id_name(mut self, name: impl Into<String>) -> Self {
        self.link_id_name = name.into();
        self
    }

    /// Local key as stored by the backend.
    #[must_use]
    pub fn backend_id_name(&self) -> String {
        backend_key(&self.id_name)
    }

    /// Child's foreign key as stored by the backend.
    #[must_use]
    pub fn backend_link_id_name(&self) -> String {
        backend_key(&self.link_id_name)
    }
}

fn backend_key(name: &str) -> String {
    if name.is_empty() { BACKEND_ID.to_string() } else { crate::pipeline::backend_path(name) }
}

#[derive(Debug, Clone)]
pub struct ModelLink {
    pub name: String,
    pub schema: &'static Schema,
    pub collection: String,
    pub resolvers: Vec<FieldLink>,
}

impl ModelLink {
    #[must_use]
    pub fn new<E: Entity>(name: impl Into<String>, collection: impl Into<String>) -> Self {
        Self { name: name.into(), schema: E::schema(), collection: collection.into(), resolvers: Vec::new() }
    }

    /// Adds a join. A link reusing an existing `resolved_name` replaces it.
    #[must_use]
    pub fn link(mut self, link: FieldLink) -> Self {
        if let Some(existing) = self.resolvers.iter_mut().find(|l| l.resolved_name == link.resolved_name) {
            log::warn!("model {}: link {} redefined", self.name, link.resolved_name);
            *existing = link;
        } else {
            self.resolvers.push(link);
        }
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    models: HashMap<String, ModelLink>,
}

impl LinkGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, model: ModelLink) -> Self {
        self.insert(model);
        self
    }

    pub fn insert(&mut self, model: ModelLink) {
        self.models.insert(model.name.clone(), model);
    }

    /// # Errors
    /// `QueryError::UnknownModel` when no node has that name.
    pub fn get(&self, name: &str) -> Result<&ModelLink, QueryError> {
        self.models.get(name).ok_or_else(|| QueryError::UnknownModel(name.to_string()))
    }

    /// Checks that every link reachable from `root` targets a known model and that
    /// the reachable part of the graph is a tree.
    ///
    /// # Errors
    /// `UnknownModel` or `CyclicLinkGraph`.
    pub fn validate(&self, root: &str) -> Result<(), QueryError> {
        let mut stack = Vec::new();
        self.visit(root, &mut stack)
    }

    fn visit<'a>(&'a self, name: &str, stack: &mut Vec<&'a str>) -> Result<(), QueryError> {
        let model = self.get(name)?;
        enter(stack, &model.name)?;
        for link in &model.resolvers {
            self.visit(&link.target, stack)?;
        }
        stack.pop();
        Ok(())
    }
}

/// Pushes `name` on the recursion stack, failing if it is already an ancestor.
pub(crate) fn enter<'a>(stack: &mut Vec<&'a str>, name: &'a str) -> Result<(), QueryError> {
    if stack.contains(&name) {
        let mut chain: Vec<&str> = stack.clone();
        chain.push(name);
        return Err(QueryError::CyclicLinkGraph(chain.join(" -> ")));
    }
    stack.push(name);
    Ok(())
}
