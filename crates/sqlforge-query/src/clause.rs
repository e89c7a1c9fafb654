//! Structured filter and ordering trees.
//!
//! Filters arrive here already structured (field/operator/value); parsing
//! expression trees into this shape is the caller's concern. Rendering always
//! emits placeholders, never literal values, so generated text depends on the
//! *shape* of a filter but not on the values bound to it.

use std::hash::{Hash, Hasher};

use sqlforge_core::{Dialect, Value, quote_ident};

/// Comparison operation of a single filter leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `BETWEEN`, consuming two placeholders.
    Between,
    /// `NOT BETWEEN`, consuming two placeholders.
    NotBetween,
    /// `IN`, consuming one placeholder per list element.
    In,
    /// `NOT IN`, consuming one placeholder per list element.
    NotIn,
    /// `IS NULL`, consuming no placeholder.
    IsNull,
    /// `IS NOT NULL`, consuming no placeholder.
    IsNotNull,
}

impl Operation {
    /// The SQL spelling of this operation.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Operation::Equal => "=",
            Operation::NotEqual => "<>",
            Operation::LessThan => "<",
            Operation::LessThanOrEqual => "<=",
            Operation::GreaterThan => ">",
            Operation::GreaterThanOrEqual => ">=",
            Operation::Like => "LIKE",
            Operation::NotLike => "NOT LIKE",
            Operation::Between => "BETWEEN",
            Operation::NotBetween => "NOT BETWEEN",
            Operation::In => "IN",
            Operation::NotIn => "NOT IN",
            Operation::IsNull => "IS NULL",
            Operation::IsNotNull => "IS NOT NULL",
        }
    }
}

/// How sibling conditions in a group combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Conjunction {
    /// All conditions must hold.
    #[default]
    And,
    /// Any condition may hold.
    Or,
}

impl Conjunction {
    /// The SQL spelling of this conjunction.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

/// One filter leaf: a field, an operation, and the value(s) to bind.
///
/// Equality and hashing cover the field, the operation, and the value
/// *arity*, not value content. Generated text carries placeholders only,
/// so two filters differing just in bound values produce identical text and
/// must land on the same cache entry. Arity stays significant because an
/// `IN` list expands to one placeholder per element.
#[derive(Debug, Clone)]
pub struct QueryField {
    /// The column the condition applies to.
    pub field: String,
    /// The comparison operation.
    pub operation: Operation,
    /// The value(s) the caller will bind.
    pub value: Value,
}

impl QueryField {
    /// Create a filter leaf.
    pub fn new(field: impl Into<String>, operation: Operation, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operation,
            value: value.into(),
        }
    }

    /// Number of placeholders this leaf renders.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        match self.operation {
            Operation::IsNull | Operation::IsNotNull => 0,
            Operation::Between | Operation::NotBetween => 2,
            Operation::In | Operation::NotIn => self.value.arity(),
            _ => 1,
        }
    }

    /// Render this leaf, advancing the 1-based placeholder position.
    #[must_use]
    pub fn to_sql(&self, dialect: Dialect, position: &mut usize) -> String {
        let column = quote_ident(&self.field, dialect);
        match self.operation {
            Operation::IsNull | Operation::IsNotNull => {
                format!("{} {}", column, self.operation.as_sql())
            }
            Operation::Between | Operation::NotBetween => {
                let low = dialect.placeholder(*position);
                let high = dialect.placeholder(*position + 1);
                *position += 2;
                format!("{} {} {} AND {}", column, self.operation.as_sql(), low, high)
            }
            Operation::In | Operation::NotIn => {
                let count = self.value.arity();
                let placeholders: Vec<String> = (*position..*position + count)
                    .map(|i| dialect.placeholder(i))
                    .collect();
                *position += count;
                format!(
                    "{} {} ({})",
                    column,
                    self.operation.as_sql(),
                    placeholders.join(", ")
                )
            }
            _ => {
                let placeholder = dialect.placeholder(*position);
                *position += 1;
                format!("{} {} {}", column, self.operation.as_sql(), placeholder)
            }
        }
    }

    /// Append this leaf's bindable values, in placeholder order.
    pub fn collect_parameters(&self, out: &mut Vec<Value>) {
        match self.operation {
            Operation::IsNull | Operation::IsNotNull => {}
            _ => match &self.value {
                Value::List(items) => out.extend(items.iter().cloned()),
                value => out.push(value.clone()),
            },
        }
    }
}

impl PartialEq for QueryField {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.operation == other.operation
            && self.value.arity() == other.value.arity()
    }
}

impl Eq for QueryField {}

impl Hash for QueryField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field.hash(state);
        self.operation.hash(state);
        self.value.arity().hash(state);
    }
}

/// A filter tree: leaves and nested groups joined by one conjunction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QueryGroup {
    /// How the direct children combine.
    pub conjunction: Conjunction,
    /// Leaf conditions.
    pub fields: Vec<QueryField>,
    /// Nested groups.
    pub groups: Vec<QueryGroup>,
}

impl QueryGroup {
    /// A group whose children combine with `AND`.
    #[must_use]
    pub fn all(fields: Vec<QueryField>) -> Self {
        Self {
            conjunction: Conjunction::And,
            fields,
            groups: Vec::new(),
        }
    }

    /// A group whose children combine with `OR`.
    #[must_use]
    pub fn any(fields: Vec<QueryField>) -> Self {
        Self {
            conjunction: Conjunction::Or,
            fields,
            groups: Vec::new(),
        }
    }

    /// Nest a sub-group.
    #[must_use]
    pub fn with_group(mut self, group: QueryGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// True when the tree holds no conditions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.groups.iter().all(QueryGroup::is_empty)
    }

    /// Render the tree, advancing the 1-based placeholder position.
    #[must_use]
    pub fn to_sql(&self, dialect: Dialect, position: &mut usize) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.fields.len() + self.groups.len());
        for field in &self.fields {
            parts.push(field.to_sql(dialect, position));
        }
        for group in &self.groups {
            if !group.is_empty() {
                parts.push(format!("({})", group.to_sql(dialect, position)));
            }
        }
        parts.join(&format!(" {} ", self.conjunction.as_sql()))
    }

    /// All bindable values of the tree, in placeholder order.
    #[must_use]
    pub fn parameters(&self) -> Vec<Value> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect(&self, out: &mut Vec<Value>) {
        for field in &self.fields {
            field.collect_parameters(out);
        }
        for group in &self.groups {
            group.collect(out);
        }
    }

    /// Every field name referenced anywhere in the tree.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.names(&mut names);
        names
    }

    fn names<'a>(&'a self, out: &mut Vec<&'a str>) {
        for field in &self.fields {
            out.push(field.field.as_str());
        }
        for group in &self.groups {
            group.names(out);
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// `ASC`
    Ascending,
    /// `DESC`
    Descending,
}

impl Order {
    /// The SQL spelling of this direction.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Order::Ascending => "ASC",
            Order::Descending => "DESC",
        }
    }
}

/// One ordering term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderField {
    /// The column to order by.
    pub field: String,
    /// Sort direction.
    pub order: Order,
}

impl OrderField {
    /// Ascending order on a column.
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: Order::Ascending,
        }
    }

    /// Descending order on a column.
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: Order::Descending,
        }
    }

    /// Render this term.
    #[must_use]
    pub fn to_sql(&self, dialect: Dialect) -> String {
        format!("{} {}", quote_ident(&self.field, dialect), self.order.as_sql())
    }
}
