//! Metadata table rows consumed by the comparer.
//!
//! Rows are immutable once built and shared through `Arc` (`XxxRc` aliases), with
//! the links between tables resolved into direct references.
//!
//! # Key Types
//! - [`Assembly`], [`AssemblyRef`] - assembly identities
//! - [`Module`], [`ModuleRef`], [`File`] - modules and files of an assembly
//! - [`TypeDef`], [`TypeRef`], [`TypeSpec`], [`ExportedType`] - type rows
//! - [`Method`], [`Field`], [`MemberRef`], [`MethodSpec`], [`Property`], [`Event`] - member rows

mod assembly;
mod event;
mod exportedtype;
mod field;
mod memberref;
mod method;
mod methodspec;
mod module;
mod property;
mod typedef;
mod typeref;
mod typespec;

pub use assembly::*;
pub use event::*;
pub use exportedtype::*;
pub use field::*;
pub use memberref::*;
pub use method::*;
pub use methodspec::*;
pub use module::*;
pub use property::*;
pub use typedef::*;
pub use typeref::*;
pub use typespec::*;
