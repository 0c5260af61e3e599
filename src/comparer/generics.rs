//! Generic argument substitution for one comparison session.
//!
//! Members reached through an instantiated generic type, or through a `MethodSpec`,
//! are hashed with their generic parameters replaced by the instantiation arguments.
//! That makes the hash of `List<int>::Add(!0)` match the hash reflection produces for
//! the same method, whose parameter is reported as `int`.

use crate::metadata::signatures::TypeSignature;

/// One stack of argument frames, either for type or for method generic parameters
#[derive(Debug, Default)]
struct ArgumentFrames {
    frames: Vec<Vec<TypeSignature>>,
}

impl ArgumentFrames {
    fn push(&mut self, arguments: &[TypeSignature]) {
        self.frames.push(arguments.to_vec());
    }

    fn pop(&mut self) {
        self.frames.pop();
    }

    /// Walks the frames from the innermost one. An argument that is itself a generic
    /// parameter of the same kind is looked up in the next outer frame.
    fn resolve(&self, mut number: u32, type_parameter: bool) -> Option<TypeSignature> {
        let mut result = None;
        for arguments in self.frames.iter().rev() {
            let argument = arguments.get(number as usize)?;
            match argument {
                TypeSignature::GenericParamType(next) if type_parameter => {
                    number = *next;
                    result = Some(argument);
                }
                TypeSignature::GenericParamMethod(next) if !type_parameter => {
                    number = *next;
                    result = Some(argument);
                }
                _ => return Some(argument.clone()),
            }
        }
        result.cloned()
    }
}

/// The type-parameter and method-parameter frame stacks
#[derive(Debug, Default)]
pub(crate) struct GenericArguments {
    type_arguments: ArgumentFrames,
    method_arguments: ArgumentFrames,
}

impl GenericArguments {
    pub(crate) fn push_type_args(&mut self, arguments: &[TypeSignature]) {
        self.type_arguments.push(arguments);
    }

    pub(crate) fn pop_type_args(&mut self) {
        self.type_arguments.pop();
    }

    pub(crate) fn push_method_args(&mut self, arguments: &[TypeSignature]) {
        self.method_arguments.push(arguments);
    }

    pub(crate) fn pop_method_args(&mut self) {
        self.method_arguments.pop();
    }

    /// True if no frame is active
    pub(crate) fn is_empty(&self) -> bool {
        self.type_arguments.frames.is_empty() && self.method_arguments.frames.is_empty()
    }

    /// Substitutes a generic parameter leaf.
    ///
    /// Returns `None` if `sig` is not a generic parameter, no frame covers it, or its
    /// position is out of range of the innermost frame. A method parameter that resolves
    /// to a type parameter continues through the type frames.
    pub(crate) fn resolve(&self, sig: &TypeSignature) -> Option<TypeSignature> {
        let mut resolved = None;

        if let TypeSignature::GenericParamMethod(number) = sig {
            resolved = Some(self.method_arguments.resolve(*number, false)?);
        }

        let current = resolved.as_ref().unwrap_or(sig);
        if let TypeSignature::GenericParamType(number) = current {
            if let Some(argument) = self.type_arguments.resolve(*number, true) {
                return Some(argument);
            }
        }

        resolved
    }
}
