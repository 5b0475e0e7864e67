//! Tool Definition Macros
//!
//! Simplifies tool creation by reducing boilerplate

/// Define tool metadata using a declarative syntax
///
/// # Example
/// ```
/// use switchboard::tool_metadata;
///
/// let metadata = tool_metadata! {
///     name: "update_phone",
///     description: "Called when the user provides their phone number",
///     parameters: [
///         {
///             name: "phone",
///             type: "string",
///             description: "The customer's phone number",
///             required: true
///         }
///     ]
/// };
/// assert_eq!(metadata.parameters.len(), 1);
/// ```
#[macro_export]
macro_rules! tool_metadata {
    (
        name: $name:expr,
        description: $description:expr,
        parameters: [
            $(
                {
                    name: $param_name:expr,
                    type: $param_type:expr,
                    description: $param_desc:expr,
                    required: $param_required:expr
                }
            ),* $(,)?
        ]
    ) => {
        $crate::tools::ToolMetadata {
            name: $name.to_string(),
            description: $description.to_string(),
            parameters: vec![
                $(
                    $crate::tools::ToolParameter {
                        name: $param_name.to_string(),
                        param_type: $param_type.to_string(),
                        description: $param_desc.to_string(),
                        required: $param_required,
                    }
                ),*
            ],
        }
    };
}

/// Declare an argument-less tool that unconditionally hands off to one agent
///
/// ```ignore
/// transfer_tool!(ToGreeter, "to_greeter", "greeter", "Return to the receptionist");
/// ```
#[macro_export]
macro_rules! transfer_tool {
    ($ty:ident, $name:expr, $target:expr, $description:expr) => {
        pub struct $ty;

        impl $crate::tools::Tool for $ty {
            fn metadata(&self) -> $crate::tools::ToolMetadata {
                $crate::tool_metadata! {
                    name: $name,
                    description: $description,
                    parameters: []
                }
            }

            fn handoff_target(&self) -> Option<&'static str> {
                Some($target)
            }

            fn execute(
                &self,
                _args: serde_json::Value,
                ctx: &mut $crate::tools::ToolContext<'_>,
            ) -> $crate::error::Result<$crate::tools::HandoffDirective> {
                ctx.transfer_to($target)
            }
        }
    };
}
