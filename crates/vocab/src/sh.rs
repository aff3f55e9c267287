// SPDX-FileCopyrightText: 2023 - 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! [SHACL](http://www.w3.org/ns/shacl) vocabulary.

use crate::named_node;

pub const NS_BASE: &str = "http://www.w3.org/ns/shacl#";
pub const NS_PREFERRED_PREFIX: &str = "sh";

// Shapes and targets

named_node!(NODE_SHAPE, NS_BASE, "NodeShape", "A node shape is a shape that specifies constraint that need to be met with respect to focus nodes.");
named_node!(PROPERTY_SHAPE, NS_BASE, "PropertyShape","A property shape is a shape that specifies constraints on the values of a focus node for a given property or path.");
named_node!(TARGET_CLASS, NS_BASE, "targetClass", "Links a shape to a class, indicating that all instances of the class must conform to the shape.");
named_node!(
    TARGET_NODE,
    NS_BASE,
    "targetNode",
    "Links a shape to individual nodes, indicating that these nodes must conform to the shape."
);
named_node!(TARGET_OBJECTS_OF, NS_BASE, "targetObjectsOf", "Links a shape to a property, indicating that all all objects of triples that have the given property as their predicate must conform to the shape.");
named_node!(TARGET_SUBJECTS_OF, NS_BASE, "targetSubjectsOf", "Links a shape to a property, indicating that all subjects of triples that have the given property as their predicate must conform to the shape.");
named_node!(
    PROPERTY,
    NS_BASE,
    "property",
    "Links a shape to its property shapes."
);
named_node!(
    PATH,
    NS_BASE,
    "path",
    "Specifies the property path of a property shape."
);
named_node!(
    DEACTIVATED,
    NS_BASE,
    "deactivated",
    "If set to true then all nodes conform to this."
);
named_node!(
    NAME,
    NS_BASE,
    "name",
    "Human-readable labels for the property in the context of the surrounding shape."
);
named_node!(
    DESCRIPTION,
    NS_BASE,
    "description",
    "Human-readable descriptions for the property in the context of the surrounding shape."
);
named_node!(
    MESSAGE,
    NS_BASE,
    "message",
    "A human-readable message (possibly with placeholders for variables) explaining the cause of the result."
);
named_node!(
    SEVERITY,
    NS_BASE,
    "severity",
    "Defines the severity that validation results produced by a shape must have."
);
named_node!(VIOLATION, NS_BASE, "Violation", "The severity for a violation validation result.");
named_node!(WARNING, NS_BASE, "Warning", "The severity for a warning validation result.");
named_node!(INFO, NS_BASE, "Info", "The severity for an informational validation result.");

// Constraint parameters

named_node!(
    MAX_COUNT,
    NS_BASE,
    "maxCount",
    "Specifies the maximum number of values in the set of value nodes."
);
named_node!(
    MIN_COUNT,
    NS_BASE,
    "minCount",
    "Specifies the minimum number of values in the set of value nodes."
);
named_node!(
    CLASS,
    NS_BASE,
    "class",
    "The type that all value nodes must have."
);
named_node!(
    DATA_TYPE,
    NS_BASE,
    "datatype",
    "Specifies an RDF datatype that all value nodes must have."
);
named_node!(
    NODE_KIND,
    NS_BASE,
    "nodeKind",
    "Specifies the node kind (e.g. IRI or literal) each value node."
);
named_node!(IRI, NS_BASE, "IRI", "The node kind of all IRIs.");
named_node!(BLANK_NODE, NS_BASE, "BlankNode", "The node kind of all blank nodes.");
named_node!(LITERAL, NS_BASE, "Literal", "The node kind of all literals.");
named_node!(BLANK_NODE_OR_IRI, NS_BASE, "BlankNodeOrIRI", "The node kind of all blank nodes or IRIs.");
named_node!(BLANK_NODE_OR_LITERAL, NS_BASE, "BlankNodeOrLiteral", "The node kind of all blank nodes or literals.");
named_node!(IRI_OR_LITERAL, NS_BASE, "IRIOrLiteral", "The node kind of all IRIs or literals.");
named_node!(PATTERN, NS_BASE, "pattern", "Specifies a regular expression pattern that the string representations of the value nodes must match.");
named_node!(
    FLAGS,
    NS_BASE,
    "flags",
    "An optional flag to be used with regular expression pattern matching."
);
named_node!(
    MIN_LENGTH,
    NS_BASE,
    "minLength",
    "Specifies the minimum string length of each value node that satisfies the condition."
);
named_node!(
    MAX_LENGTH,
    NS_BASE,
    "maxLength",
    "Specifies the maximum string length of each value node that satisfies the condition."
);
named_node!(MIN_INCLUSIVE, NS_BASE, "minInclusive", "Specifies the minimum inclusive value of each value node.");
named_node!(MAX_INCLUSIVE, NS_BASE, "maxInclusive", "Specifies the maximum inclusive value of each value node.");
named_node!(MIN_EXCLUSIVE, NS_BASE, "minExclusive", "Specifies the minimum exclusive value of each value node.");
named_node!(MAX_EXCLUSIVE, NS_BASE, "maxExclusive", "Specifies the maximum exclusive value of each value node.");
named_node!(IN, NS_BASE, "in", "Specifies a list of allowed values so that each value node must be among the members of the given list.");
named_node!(
    HAS_VALUE,
    NS_BASE,
    "hasValue",
    "Specifies a value that must be among the value nodes."
);
named_node!(
    NODE,
    NS_BASE,
    "node",
    "Specifies the node shape that all value nodes must conform to."
);
named_node!(QUALIFIED_VALUE_SHAPE, NS_BASE, "qualifiedValueShape", "The shape that a specified number of values must conform to.");
named_node!(QUALIFIED_MIN_COUNT, NS_BASE, "qualifiedMinCount", "The minimum number of value nodes that conform to the shape.");
named_node!(QUALIFIED_MAX_COUNT, NS_BASE, "qualifiedMaxCount", "The maximum number of value nodes that can conform to the shape.");
named_node!(
    AND,
    NS_BASE,
    "and",
    "RDF list of shapes to validate the value nodes against."
);
named_node!(
    OR,
    NS_BASE,
    "or",
    "Specifies the condition that each value node conforms to at least one of the provided shapes."
);
named_node!(XONE, NS_BASE, "xone", "Specifies a list of shapes so that the value nodes must conform to exactly one of the shapes.");
named_node!(
    NOT,
    NS_BASE,
    "not",
    "Specifies a shape that the value nodes must not conform to."
);

// SPARQL-based constraints

named_node!(
    SPARQL,
    NS_BASE,
    "sparql",
    "Links a shape with SPARQL constraints."
);
named_node!(
    SELECT,
    NS_BASE,
    "select",
    "The SPARQL SELECT query to execute."
);
named_node!(
    PREFIXES,
    NS_BASE,
    "prefixes",
    "The prefixes that shall be applied before parsing the associated SPARQL query."
);
named_node!(
    DECLARE,
    NS_BASE,
    "declare",
    "Links a resource with its namespace prefix declarations."
);
named_node!(
    PREFIX,
    NS_BASE,
    "prefix",
    "The prefix of a prefix declaration."
);
named_node!(
    NAMESPACE,
    NS_BASE,
    "namespace",
    "The namespace associated with a prefix in a prefix declaration."
);

// Validation report

named_node!(VALIDATION_REPORT, NS_BASE, "ValidationReport", "The class of SHACL validation reports.");
named_node!(VALIDATION_RESULT, NS_BASE, "ValidationResult", "The class of validation results.");
named_node!(CONFORMS, NS_BASE, "conforms", "True if the validation did not produce any validation results, and false otherwise.");
named_node!(
    RESULT,
    NS_BASE,
    "result",
    "The validation results contained in a validation report."
);
named_node!(FOCUS_NODE, NS_BASE, "focusNode", "The focus node that was validated when the result was produced.");
named_node!(RESULT_PATH, NS_BASE, "resultPath", "The path of a validation result, based on the path of the validated property shape.");
named_node!(RESULT_SEVERITY, NS_BASE, "resultSeverity", "The severity of the result, e.g. warning.");
named_node!(RESULT_MESSAGE, NS_BASE, "resultMessage", "Human-readable messages explaining the cause of the result.");
named_node!(SOURCE_SHAPE, NS_BASE, "sourceShape", "The shape that is was validated when the result was produced.");
named_node!(SOURCE_CONSTRAINT_COMPONENT, NS_BASE, "sourceConstraintComponent", "The constraint component that is the source of the result.");
named_node!(
    VALUE,
    NS_BASE,
    "value",
    "An RDF node that has caused the result."
);

// Constraint components

named_node!(MIN_COUNT_CONSTRAINT_COMPONENT, NS_BASE, "MinCountConstraintComponent", "A constraint component that can be used to restrict the minimum number of value nodes.");
named_node!(MAX_COUNT_CONSTRAINT_COMPONENT, NS_BASE, "MaxCountConstraintComponent", "A constraint component that can be used to restrict the maximum number of value nodes.");
named_node!(DATATYPE_CONSTRAINT_COMPONENT, NS_BASE, "DatatypeConstraintComponent", "A constraint component that can be used to restrict the datatype of all value nodes.");
named_node!(CLASS_CONSTRAINT_COMPONENT, NS_BASE, "ClassConstraintComponent", "A constraint component that can be used to verify that each value node is an instance of a given type.");
named_node!(NODE_KIND_CONSTRAINT_COMPONENT, NS_BASE, "NodeKindConstraintComponent", "A constraint component that can be used to restrict the RDF node kind of each value node.");
named_node!(PATTERN_CONSTRAINT_COMPONENT, NS_BASE, "PatternConstraintComponent", "A constraint component that can be used to verify that every value node matches a given regular expression.");
named_node!(MIN_LENGTH_CONSTRAINT_COMPONENT, NS_BASE, "MinLengthConstraintComponent", "A constraint component that can be used to restrict the minimum string length of value nodes.");
named_node!(MAX_LENGTH_CONSTRAINT_COMPONENT, NS_BASE, "MaxLengthConstraintComponent", "A constraint component that can be used to restrict the maximum string length of value nodes.");
named_node!(MIN_INCLUSIVE_CONSTRAINT_COMPONENT, NS_BASE, "MinInclusiveConstraintComponent", "A constraint component that can be used to restrict the range of value nodes with a minimum inclusive value.");
named_node!(MAX_INCLUSIVE_CONSTRAINT_COMPONENT, NS_BASE, "MaxInclusiveConstraintComponent", "A constraint component that can be used to restrict the range of value nodes with a maximum inclusive value.");
named_node!(MIN_EXCLUSIVE_CONSTRAINT_COMPONENT, NS_BASE, "MinExclusiveConstraintComponent", "A constraint component that can be used to restrict the range of value nodes with a minimum exclusive value.");
named_node!(MAX_EXCLUSIVE_CONSTRAINT_COMPONENT, NS_BASE, "MaxExclusiveConstraintComponent", "A constraint component that can be used to restrict the range of value nodes with a maximum exclusive value.");
named_node!(IN_CONSTRAINT_COMPONENT, NS_BASE, "InConstraintComponent", "A constraint component that can be used to exclusively enumerate the permitted value nodes.");
named_node!(HAS_VALUE_CONSTRAINT_COMPONENT, NS_BASE, "HasValueConstraintComponent", "A constraint component that can be used to verify that one of the value nodes is a given RDF node.");
named_node!(NODE_CONSTRAINT_COMPONENT, NS_BASE, "NodeConstraintComponent", "A constraint component that can be used to verify that all value nodes conform to the given node shape.");
named_node!(QUALIFIED_MIN_COUNT_CONSTRAINT_COMPONENT, NS_BASE, "QualifiedMinCountConstraintComponent", "A constraint component that can be used to verify that a specified minimum number of value nodes conforms to a given shape.");
named_node!(QUALIFIED_MAX_COUNT_CONSTRAINT_COMPONENT, NS_BASE, "QualifiedMaxCountConstraintComponent", "A constraint component that can be used to verify that a specified maximum number of value nodes conforms to a given shape.");
named_node!(AND_CONSTRAINT_COMPONENT, NS_BASE, "AndConstraintComponent", "A constraint component that can be used to test whether a value node conforms to all members of a provided list of shapes.");
named_node!(OR_CONSTRAINT_COMPONENT, NS_BASE, "OrConstraintComponent", "A constraint component that can be used to restrict the value nodes so that they conform to at least one out of several provided shapes.");
named_node!(XONE_CONSTRAINT_COMPONENT, NS_BASE, "XoneConstraintComponent", "A constraint component that can be used to restrict the value nodes so that they conform to exactly one out of several provided shapes.");
named_node!(NOT_CONSTRAINT_COMPONENT, NS_BASE, "NotConstraintComponent", "A constraint component that can be used to verify that value nodes do not conform to a given shape.");
named_node!(SPARQL_CONSTRAINT_COMPONENT, NS_BASE, "SPARQLConstraintComponent", "A constraint component that can be used to define constraints based on SPARQL queries.");
