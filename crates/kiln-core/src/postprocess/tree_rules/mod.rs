/*!
# Tree Normalization Rules

The rewrites applied right after parsing. Enter-phase rules see a node before
its children; exit-phase rules see it after its children were normalized.
*/

pub mod builtins;
pub mod call_forwarding;
pub mod list_destructure;
pub mod member_access;
pub mod sign_fold;
pub mod superglobals;

pub use builtins::{builtin_names, lookup_builtin, BuiltinIntrinsicRule, BuiltinSpec};
pub use call_forwarding::{CallForwardingRule, CALL_FORWARDING_FUNCTION};
pub use list_destructure::ListDestructureRule;
pub use member_access::{MemberAccessRule, MethodDescriptorRule};
pub use sign_fold::SignFoldRule;
pub use superglobals::{is_superglobal, SuperglobalRule};

use super::rules::RewriteRule;

/// Default rule set, in application order
pub fn default_rules() -> Vec<Box<dyn RewriteRule>> {
    vec![
        // enter
        Box::new(BuiltinIntrinsicRule),
        Box::new(SignFoldRule),
        Box::new(ListDestructureRule),
        Box::new(CallForwardingRule),
        Box::new(MethodDescriptorRule),
        // exit
        Box::new(SuperglobalRule),
        Box::new(MemberAccessRule),
    ]
}
