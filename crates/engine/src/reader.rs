// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Reads a shapes graph into a [`ShapesModel`].

use std::collections::{HashMap, HashSet};

use graphshape_iri::{Prefix, Prologue};
use graphshape_vocab::sh;
use oxrdf::vocab::rdf;
use oxrdf::{Graph, Literal, NamedNode, NamedNodeRef, SubjectRef, Term, TermRef, TripleRef};

use crate::constraints::range::Numeric;
use crate::error::{Location, ShapesError};
use crate::model::{
    Comparison, Constraint, NodeKind, NodeShape, Pattern, PropertyShape, RangeBound, Severity,
    ShapeHandle, ShapeId, ShapesModel, SparqlConstraint,
};

const TARGETS: [NamedNodeRef<'static>; 4] = [
    sh::TARGET_CLASS,
    sh::TARGET_NODE,
    sh::TARGET_SUBJECTS_OF,
    sh::TARGET_OBJECTS_OF,
];

/// Predicates that make a node a shape, even without targets
/// or an explicit `rdf:type sh:NodeShape`.
const SHAPE_PREDICATES: [NamedNodeRef<'static>; 25] = [
    sh::PATH,
    sh::PROPERTY,
    sh::AND,
    sh::OR,
    sh::XONE,
    sh::NOT,
    sh::NODE,
    sh::SPARQL,
    sh::CLASS,
    sh::DATA_TYPE,
    sh::NODE_KIND,
    sh::PATTERN,
    sh::MIN_LENGTH,
    sh::MAX_LENGTH,
    sh::MIN_INCLUSIVE,
    sh::MAX_INCLUSIVE,
    sh::MIN_EXCLUSIVE,
    sh::MAX_EXCLUSIVE,
    sh::IN,
    sh::HAS_VALUE,
    sh::DEACTIVATED,
    sh::SEVERITY,
    sh::MESSAGE,
    sh::TARGET_CLASS,
    sh::TARGET_NODE,
];

const RANGES: [(NamedNodeRef<'static>, Comparison); 4] = [
    (sh::MIN_INCLUSIVE, Comparison::MinInclusive),
    (sh::MAX_INCLUSIVE, Comparison::MaxInclusive),
    (sh::MIN_EXCLUSIVE, Comparison::MinExclusive),
    (sh::MAX_EXCLUSIVE, Comparison::MaxExclusive),
];

/// Reads all node shapes from a shapes graph.
///
/// Node shapes are all subjects typed `sh:NodeShape`
/// or carrying a target (`sh:targetClass`, `sh:targetNode`,
/// `sh:targetSubjectsOf`, `sh:targetObjectsOf`),
/// plus every shape these (transitively) refer to.
///
/// # Errors
///
/// If any part of the shapes graph is malformed.
/// Nothing is returned in that case, not even the well-formed shapes.
pub fn parse_shapes(shapes_graph: &Graph) -> Result<ShapesModel, ShapesError> {
    let mut reader = Reader::new(shapes_graph);
    let top_level = reader.discover();
    tracing::debug!("Found {} top-level shapes", top_level.len());
    for id in top_level {
        reader.top_level(id)?;
    }
    let model = reader.finish()?;
    for cycle in model.reference_cycles() {
        let members: Vec<String> = cycle
            .iter()
            .map(|handle| model.get(*handle).id.to_string())
            .collect();
        tracing::debug!(
            "Cyclic shape references between: {}; validation depth is limited",
            members.join(", ")
        );
    }
    Ok(model)
}

fn shape_id(term: TermRef<'_>) -> Option<ShapeId> {
    match term {
        TermRef::NamedNode(node) => Some(node.into_owned().into()),
        TermRef::BlankNode(node) => Some(node.into_owned().into()),
        TermRef::Literal(_) | TermRef::Triple(_) => None,
    }
}

struct Reader<'g> {
    graph: &'g Graph,
    /// `slots[i]` is the shape `ShapeHandle(i)` refers to,
    /// once it is read.
    slots: Vec<Option<NodeShape>>,
    ids: Vec<ShapeId>,
    index: HashMap<ShapeId, ShapeHandle>,
    /// Where a not-yet-read shape was first referenced from.
    referrers: HashMap<ShapeHandle, Location>,
}

impl<'g> Reader<'g> {
    fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            slots: Vec::new(),
            ids: Vec::new(),
            index: HashMap::new(),
            referrers: HashMap::new(),
        }
    }

    fn discover(&self) -> Vec<ShapeId> {
        let mut seen = HashSet::new();
        let typed = self
            .graph
            .subjects_for_predicate_object(rdf::TYPE, sh::NODE_SHAPE)
            .map(|subject| Term::from(subject.into_owned()));
        let targeted = TARGETS.into_iter().flat_map(|target| {
            self.graph
                .triples_for_predicate(target)
                .map(|triple| Term::from(triple.subject.into_owned()))
        });
        typed
            .chain(targeted)
            .filter_map(|subject| shape_id(subject.as_ref()))
            .filter(|id| {
                if !self.objects(id, sh::PATH).is_empty() {
                    tracing::warn!("Ignoring targets of property shape {id}; only node shapes can be targeted");
                    return false;
                }
                true
            })
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }

    fn objects(&self, id: &ShapeId, property: NamedNodeRef<'_>) -> Vec<TermRef<'g>> {
        self.graph
            .objects_for_subject_predicate(id.as_subject(), property)
            .collect()
    }

    fn describes_shape(&self, id: &ShapeId) -> bool {
        self.graph
            .contains(TripleRef::new(id.as_subject(), rdf::TYPE, sh::NODE_SHAPE))
            || SHAPE_PREDICATES
                .iter()
                .any(|property| !self.objects(id, *property).is_empty())
    }

    fn reserve(&mut self, id: ShapeId) -> ShapeHandle {
        if let Some(handle) = self.index.get(&id) {
            return *handle;
        }
        let handle = ShapeHandle(self.slots.len());
        self.slots.push(None);
        self.ids.push(id.clone());
        self.index.insert(id, handle);
        handle
    }

    fn is_read(&self, handle: ShapeHandle) -> bool {
        self.slots.get(handle.index()).is_some_and(Option::is_some)
    }

    fn top_level(&mut self, id: ShapeId) -> Result<(), ShapesError> {
        let handle = self.reserve(id.clone());
        if !self.is_read(handle) {
            self.read_node_shape(id, handle)?;
        }
        Ok(())
    }

    /// Resolves a reference to another shape.
    /// Blank shapes are read right away,
    /// named ones once all top-level shapes are read.
    fn shape_ref(
        &mut self,
        referrer: &Location,
        property: NamedNodeRef<'_>,
        node: TermRef<'_>,
    ) -> Result<ShapeHandle, ShapesError> {
        let id = shape_id(node).ok_or_else(|| ShapesError::InvalidValue {
            location: referrer.clone(),
            property: property.into_owned(),
            value: node.to_string(),
            reason: "expected a shape (IRI or blank node)".to_owned(),
        })?;
        if let Some(handle) = self.index.get(&id) {
            return Ok(*handle);
        }
        let handle = self.reserve(id.clone());
        match id {
            ShapeId::Blank(_) => self.read_node_shape(id, handle)?,
            ShapeId::Named(_) => {
                self.referrers.insert(handle, referrer.clone());
            }
        }
        Ok(handle)
    }

    fn finish(mut self) -> Result<ShapesModel, ShapesError> {
        loop {
            let pending: Vec<ShapeHandle> = (0..self.slots.len())
                .map(ShapeHandle)
                .filter(|handle| !self.is_read(*handle))
                .collect();
            if pending.is_empty() {
                break;
            }
            for handle in pending {
                let Some(id) = self.ids.get(handle.index()).cloned() else {
                    continue;
                };
                if !self.describes_shape(&id) {
                    return Err(ShapesError::UnresolvedReference {
                        referrer: self
                            .referrers
                            .remove(&handle)
                            .unwrap_or_else(|| Location::shape(id.clone())),
                        reference: id,
                    });
                }
                tracing::trace!("Reading referenced shape {id}");
                self.read_node_shape(id, handle)?;
            }
        }
        Ok(ShapesModel::from_shapes(
            self.slots.into_iter().flatten().collect(),
        ))
    }

    fn read_node_shape(&mut self, id: ShapeId, handle: ShapeHandle) -> Result<(), ShapesError> {
        if !self.objects(&id, sh::PATH).is_empty() {
            return self.read_property_wrapper(id, handle);
        }
        let location = Location::shape(id.clone());
        let mut shape = NodeShape::new(id.clone());

        shape.deactivated = self.bool_param(&location, &id, sh::DEACTIVATED)?.unwrap_or(false);
        shape.severity = self.severity(&location, &id)?.unwrap_or_default();
        shape.message = self.string_param(&id, sh::MESSAGE);

        shape.target_classes = self.named_params(&location, &id, sh::TARGET_CLASS)?;
        shape.target_nodes = self
            .objects(&id, sh::TARGET_NODE)
            .into_iter()
            .map(TermRef::into_owned)
            .collect();
        shape.target_subjects_of = self.named_params(&location, &id, sh::TARGET_SUBJECTS_OF)?;
        shape.target_objects_of = self.named_params(&location, &id, sh::TARGET_OBJECTS_OF)?;

        let property_nodes = self.objects(&id, sh::PROPERTY);
        for property_node in property_nodes {
            if let Some(property) = self.read_property_shape(&location, property_node)? {
                shape.properties.push(property);
            }
        }

        shape.constraints = self.value_constraints(&location, &id)?;
        shape.and = self.shape_list(&location, &id, sh::AND)?;
        shape.or = self.shape_list(&location, &id, sh::OR)?;
        shape.xone = self.shape_list(&location, &id, sh::XONE)?;
        let negated = self.objects(&id, sh::NOT);
        shape.not = match negated.as_slice() {
            [] => None,
            [single] => Some(self.shape_ref(&location, sh::NOT, *single)?),
            [_, second, ..] => {
                return Err(ShapesError::InvalidValue {
                    location,
                    property: sh::NOT.into_owned(),
                    value: second.to_string(),
                    reason: "only a single sh:not per shape is supported".to_owned(),
                })
            }
        };

        let sparql_nodes = self.objects(&id, sh::SPARQL);
        for sparql_node in sparql_nodes {
            if let Some(sparql) = self.read_sparql(&location, sparql_node)? {
                shape.sparql.push(sparql);
            }
        }

        if shape.deactivated {
            tracing::debug!("Shape {id} is deactivated");
        }
        if let Some(slot) = self.slots.get_mut(handle.index()) {
            *slot = Some(shape);
        }
        Ok(())
    }

    /// A property shape used where a node shape is expected
    /// (e.g. as a member of `sh:or`)
    /// applies to the focus node like a node shape with just that property.
    fn read_property_wrapper(&mut self, id: ShapeId, handle: ShapeHandle) -> Result<(), ShapesError> {
        let location = Location::shape(id.clone());
        let mut shape = NodeShape::new(id.clone());
        shape.properties.extend(self.read_property_shape_at(&location, id)?);
        if let Some(slot) = self.slots.get_mut(handle.index()) {
            *slot = Some(shape);
        }
        Ok(())
    }

    fn read_property_shape(
        &mut self,
        owner: &Location,
        node: TermRef<'g>,
    ) -> Result<Option<PropertyShape>, ShapesError> {
        let id = shape_id(node).ok_or_else(|| ShapesError::InvalidValue {
            location: owner.clone(),
            property: sh::PROPERTY.into_owned(),
            value: node.to_string(),
            reason: "expected a property shape (IRI or blank node)".to_owned(),
        })?;
        self.read_property_shape_at(owner, id)
    }

    fn read_property_shape_at(
        &mut self,
        owner: &Location,
        id: ShapeId,
    ) -> Result<Option<PropertyShape>, ShapesError> {
        let path = match self.objects(&id, sh::PATH).first().copied() {
            Some(TermRef::NamedNode(path)) => path.into_owned(),
            Some(TermRef::BlankNode(_) | TermRef::Literal(_) | TermRef::Triple(_)) => {
                return Err(ShapesError::UnsupportedPath {
                    location: owner.clone(),
                    property: id,
                });
            }
            None => {
                return Err(ShapesError::MissingPath {
                    location: owner.clone(),
                    property: id,
                });
            }
        };
        let location = owner.with_path(path.clone());
        if self.bool_param(&location, &id, sh::DEACTIVATED)?.unwrap_or(false) {
            tracing::debug!("Property shape {id} ({path}) is deactivated");
            return Ok(None);
        }

        let mut constraints = Vec::new();
        let min_count = self.count_param(&location, &id, sh::MIN_COUNT)?;
        let max_count = self.count_param(&location, &id, sh::MAX_COUNT)?;
        if min_count.is_some() || max_count.is_some() {
            constraints.push(Constraint::Cardinality {
                min: min_count,
                max: max_count,
            });
        }
        constraints.extend(self.value_constraints(&location, &id)?);

        let qualified_min = self.count_param(&location, &id, sh::QUALIFIED_MIN_COUNT)?;
        let qualified_max = self.count_param(&location, &id, sh::QUALIFIED_MAX_COUNT)?;
        match self.objects(&id, sh::QUALIFIED_VALUE_SHAPE).first().copied() {
            Some(qualified) => {
                let shape = self.shape_ref(&location, sh::QUALIFIED_VALUE_SHAPE, qualified)?;
                constraints.push(Constraint::Qualified {
                    shape,
                    min: qualified_min,
                    max: qualified_max,
                });
            }
            None if qualified_min.is_some() || qualified_max.is_some() => {
                return Err(ShapesError::MissingQualifiedShape { location });
            }
            None => {}
        }

        Ok(Some(PropertyShape {
            name: self.string_param(&id, sh::NAME),
            severity: self.severity(&location, &id)?,
            message: self.string_param(&id, sh::MESSAGE),
            id,
            path,
            constraints,
        }))
    }

    /// The constraints that apply to the value nodes of a shape;
    /// for node shapes, that is the focus node itself.
    fn value_constraints(
        &mut self,
        location: &Location,
        id: &ShapeId,
    ) -> Result<Vec<Constraint>, ShapesError> {
        let mut constraints = Vec::new();
        for datatype in self.named_params(location, id, sh::DATA_TYPE)? {
            constraints.push(Constraint::Datatype(datatype));
        }
        for class in self.named_params(location, id, sh::CLASS)? {
            constraints.push(Constraint::Class(class));
        }
        for kind_iri in self.named_params(location, id, sh::NODE_KIND)? {
            let kind = NodeKind::from_iri(kind_iri.as_ref()).ok_or_else(|| {
                ShapesError::InvalidValue {
                    location: location.clone(),
                    property: sh::NODE_KIND.into_owned(),
                    value: kind_iri.to_string(),
                    reason: "not a node kind".to_owned(),
                }
            })?;
            constraints.push(Constraint::NodeKind(kind));
        }

        let flags = self.string_param(id, sh::FLAGS);
        for source in self.literal_params(location, id, sh::PATTERN)? {
            let pattern = Pattern::new(source.value().to_owned(), flags.clone()).map_err(
                |source_err| ShapesError::InvalidPattern {
                    location: location.clone(),
                    pattern: source.value().to_owned(),
                    source: source_err,
                },
            )?;
            constraints.push(Constraint::Pattern(pattern));
        }

        let min_length = self.count_param(location, id, sh::MIN_LENGTH)?;
        let max_length = self.count_param(location, id, sh::MAX_LENGTH)?;
        if min_length.is_some() || max_length.is_some() {
            constraints.push(Constraint::Length {
                min: min_length,
                max: max_length,
            });
        }

        for (property, comparison) in RANGES {
            for literal in self.literal_params(location, id, property)? {
                let limit = Numeric::from_literal(&literal).ok_or_else(|| {
                    ShapesError::InvalidValue {
                        location: location.clone(),
                        property: property.into_owned(),
                        value: literal.to_string(),
                        reason: "not a number".to_owned(),
                    }
                })?;
                constraints.push(Constraint::Range(RangeBound {
                    comparison,
                    limit,
                    literal,
                }));
            }
        }

        for list in self.objects(id, sh::IN) {
            constraints.push(Constraint::In(self.rdf_list(location, sh::IN, list)?));
        }
        for value in self.objects(id, sh::HAS_VALUE) {
            constraints.push(Constraint::HasValue(value.into_owned()));
        }
        for node in self.objects(id, sh::NODE) {
            constraints.push(Constraint::Node(self.shape_ref(location, sh::NODE, node)?));
        }
        Ok(constraints)
    }

    fn shape_list(
        &mut self,
        location: &Location,
        id: &ShapeId,
        property: NamedNodeRef<'_>,
    ) -> Result<Vec<ShapeHandle>, ShapesError> {
        let mut members = Vec::new();
        for list in self.objects(id, property) {
            for member in self.rdf_list(location, property, list)? {
                members.push(self.shape_ref(location, property, member.as_ref())?);
            }
        }
        Ok(members)
    }

    fn read_sparql(
        &mut self,
        owner: &Location,
        node: TermRef<'g>,
    ) -> Result<Option<SparqlConstraint>, ShapesError> {
        let id = shape_id(node).ok_or_else(|| ShapesError::InvalidValue {
            location: owner.clone(),
            property: sh::SPARQL.into_owned(),
            value: node.to_string(),
            reason: "expected a SPARQL constraint (IRI or blank node)".to_owned(),
        })?;
        if self.bool_param(owner, &id, sh::DEACTIVATED)?.unwrap_or(false) {
            tracing::debug!("SPARQL constraint {id} is deactivated");
            return Ok(None);
        }
        let select = self
            .string_param(&id, sh::SELECT)
            .ok_or_else(|| ShapesError::MissingSelect {
                location: owner.clone(),
                constraint: id.clone(),
            })?;
        Ok(Some(SparqlConstraint {
            prologue: self.prologue(owner, &id)?,
            message: self.string_param(&id, sh::MESSAGE),
            severity: self.severity(owner, &id)?,
            id,
            select,
        }))
    }

    /// Collects the `sh:declare`d prefixes of all `sh:prefixes` of `id`.
    fn prologue(&self, location: &Location, id: &ShapeId) -> Result<Prologue, ShapesError> {
        let mut prologue = Prologue::default();
        for prefixes in self.objects(id, sh::PREFIXES) {
            let Some(prefixes_id) = shape_id(prefixes) else {
                continue;
            };
            for declaration in self.objects(&prefixes_id, sh::DECLARE) {
                let Some(declaration_id) = shape_id(declaration) else {
                    continue;
                };
                let prefix = self.string_param(&declaration_id, sh::PREFIX);
                let namespace = self.string_param(&declaration_id, sh::NAMESPACE);
                let (Some(prefix), Some(namespace)) = (prefix, namespace) else {
                    return Err(ShapesError::InvalidValue {
                        location: location.clone(),
                        property: sh::DECLARE.into_owned(),
                        value: declaration_id.to_string(),
                        reason: "a prefix declaration needs sh:prefix and sh:namespace".to_owned(),
                    });
                };
                let declared =
                    Prefix::new(prefix, namespace.clone()).map_err(|err| ShapesError::InvalidValue {
                        location: location.clone(),
                        property: sh::NAMESPACE.into_owned(),
                        value: namespace,
                        reason: err.to_string(),
                    })?;
                prologue.push(declared);
            }
        }
        Ok(prologue)
    }

    /// Reads an RDF collection (`rdf:first`/`rdf:rest`/`rdf:nil`).
    fn rdf_list(
        &self,
        location: &Location,
        property: NamedNodeRef<'_>,
        head: TermRef<'_>,
    ) -> Result<Vec<Term>, ShapesError> {
        let malformed = |reason: &str| ShapesError::MalformedList {
            location: location.clone(),
            property: property.into_owned(),
            reason: reason.to_owned(),
        };
        let mut items = Vec::new();
        let mut visited = HashSet::new();
        let mut current = head.into_owned();
        loop {
            if matches!(&current, Term::NamedNode(node) if node.as_ref() == rdf::NIL) {
                return Ok(items);
            }
            if !visited.insert(current.clone()) {
                return Err(malformed("the list is cyclic"));
            }
            let subject: SubjectRef<'_> = match &current {
                Term::NamedNode(node) => node.as_ref().into(),
                Term::BlankNode(node) => node.as_ref().into(),
                Term::Literal(_) | Term::Triple(_) => {
                    return Err(malformed(&format!("{current} can not be a list node")));
                }
            };
            let first = self
                .graph
                .object_for_subject_predicate(subject, rdf::FIRST)
                .ok_or_else(|| malformed(&format!("{current} has no rdf:first")))?
                .into_owned();
            let rest = self
                .graph
                .object_for_subject_predicate(subject, rdf::REST)
                .ok_or_else(|| malformed(&format!("{current} has no rdf:rest")))?
                .into_owned();
            items.push(first);
            current = rest;
        }
    }

    fn string_param(&self, id: &ShapeId, property: NamedNodeRef<'_>) -> Option<String> {
        self.objects(id, property).into_iter().find_map(|object| match object {
            TermRef::Literal(literal) => Some(literal.value().to_owned()),
            TermRef::NamedNode(node) => Some(node.as_str().to_owned()),
            TermRef::BlankNode(_) | TermRef::Triple(_) => None,
        })
    }

    fn invalid(
        location: &Location,
        property: NamedNodeRef<'_>,
        value: TermRef<'_>,
        reason: &str,
    ) -> ShapesError {
        ShapesError::InvalidValue {
            location: location.clone(),
            property: property.into_owned(),
            value: value.to_string(),
            reason: reason.to_owned(),
        }
    }

    fn literal_params(
        &self,
        location: &Location,
        id: &ShapeId,
        property: NamedNodeRef<'_>,
    ) -> Result<Vec<Literal>, ShapesError> {
        self.objects(id, property)
            .into_iter()
            .map(|object| match object {
                TermRef::Literal(literal) => Ok(literal.into_owned()),
                TermRef::NamedNode(_) | TermRef::BlankNode(_) | TermRef::Triple(_) => {
                    Err(Self::invalid(location, property, object, "expected a literal"))
                }
            })
            .collect()
    }

    fn named_params(
        &self,
        location: &Location,
        id: &ShapeId,
        property: NamedNodeRef<'_>,
    ) -> Result<Vec<NamedNode>, ShapesError> {
        self.objects(id, property)
            .into_iter()
            .map(|object| match object {
                TermRef::NamedNode(node) => Ok(node.into_owned()),
                TermRef::BlankNode(_) | TermRef::Literal(_) | TermRef::Triple(_) => {
                    Err(Self::invalid(location, property, object, "expected an IRI"))
                }
            })
            .collect()
    }

    fn count_param(
        &self,
        location: &Location,
        id: &ShapeId,
        property: NamedNodeRef<'_>,
    ) -> Result<Option<usize>, ShapesError> {
        self.literal_params(location, id, property)?
            .first()
            .map(|literal| {
                literal.value().trim().parse::<usize>().map_err(|_| ShapesError::InvalidValue {
                    location: location.clone(),
                    property: property.into_owned(),
                    value: literal.to_string(),
                    reason: "expected a non-negative integer".to_owned(),
                })
            })
            .transpose()
    }

    fn bool_param(
        &self,
        location: &Location,
        id: &ShapeId,
        property: NamedNodeRef<'_>,
    ) -> Result<Option<bool>, ShapesError> {
        self.literal_params(location, id, property)?
            .first()
            .map(|literal| match literal.value() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(Self::invalid(
                    location,
                    property,
                    literal.as_ref().into(),
                    "expected a boolean",
                )),
            })
            .transpose()
    }

    fn severity(&self, location: &Location, id: &ShapeId) -> Result<Option<Severity>, ShapesError> {
        self.named_params(location, id, sh::SEVERITY)?
            .first()
            .map(|iri| {
                Severity::from_iri(iri.as_ref()).ok_or_else(|| {
                    Self::invalid(
                        location,
                        sh::SEVERITY,
                        iri.as_ref().into(),
                        "expected sh:Violation, sh:Warning or sh:Info",
                    )
                })
            })
            .transpose()
    }
}
