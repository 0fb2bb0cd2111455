use aidl_ir_grammar::ast::{AidlMethod, InterfaceDecl, ParamModifier, TypeRef};
use aidl_ir_model::{BinderDef, Direction, MethodDef, ParameterDef, QName, RetEntry, ReturnDef};

use crate::import::ImportDefList;
use crate::type_handler::TypeHandler;

/// Translates an AIDL `interface` declaration into a [`BinderDef`] (§4.5).
pub fn as_binder(
    qname: &QName,
    decl: &InterfaceDecl,
    imports: &ImportDefList,
    package: Option<&str>,
) -> BinderDef {
    let handler = TypeHandler::new(imports, package);
    let methods = decl
        .methods
        .iter()
        .enumerate()
        .map(|(idx, method)| compile_method(&handler, idx, method))
        .collect();
    BinderDef::new(qname.clone(), methods)
}

fn compile_method(handler: &TypeHandler, idx: usize, method: &AidlMethod) -> MethodDef {
    let tc = method.tc_override.unwrap_or(idx as u32 + 1);
    let oneway = is_void(&method.return_type);

    let mut arguments = Vec::new();
    let mut retval: Option<Vec<RetEntry>> = if oneway {
        None
    } else {
        Some(vec![RetEntry::Return(ReturnDef::new(handler.call_of(&method.return_type)))])
    };

    for param in &method.params {
        let call = handler.call_of(&param.type_ref);
        let direction = match param.modifier {
            ParamModifier::In => Direction::In,
            ParamModifier::Out => Direction::Out,
            ParamModifier::InOut => Direction::InOut,
        };

        if matches!(direction, Direction::Out | Direction::InOut) {
            let entry = RetEntry::Param(ParameterDef::new(param.name.clone(), call.clone(), direction));
            retval.get_or_insert_with(Vec::new).push(entry);
        }
        if matches!(direction, Direction::In | Direction::InOut) {
            arguments.push(ParameterDef::new(param.name.clone(), call, direction));
        }
    }

    MethodDef { name: method.name.clone(), tc, oneway, retval, arguments }
}

fn is_void(type_ref: &TypeRef) -> bool {
    matches!(type_ref, TypeRef::Named(name) if name == "void")
}
