//! Order-preserving data model.
//!
//! ```text
//! Ast ──► Shapes (OrderedMap<Shape>)
//!           └─► Shape { kind: ShapeKind, traits: Traits, mixins }
//!                 └─► Member { target, traits } / ShapeRef { target }
//! ```
//!
//! Every map keeps insertion order so that parse → unparse → parse is
//! stable, and the JSON encoding mirrors that order.

mod ast;
pub mod deps;
mod ordered;
mod shape;
mod traits;

pub use ast::Ast;
pub use ordered::OrderedMap;
pub use shape::{
    Member, Members, OperationShape, ResourceShape, ServiceShape, Shape, ShapeKind, ShapeRef,
    Shapes, SimpleType, Traits,
};
pub use traits::field_str;
