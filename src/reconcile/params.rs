use tracing::debug;

use crate::graph::{LiveParam, ParamOrigin};

/// Fold a freshly extracted parameter signature into a block's live
/// parameter list.
///
/// Intrinsic parameters keep their position ahead of discovered ones.
/// Discovered parameters are rebuilt in declaration order, reusing the
/// existing object when the id survives: the stored default always
/// follows the source, and the live value follows it too as long as the
/// user never customized it. Discovered parameters whose id disappeared
/// are dropped.
pub fn update_params(live: &mut Vec<LiveParam>, params_in_src: &[(String, String)]) {
    let mut existing: Vec<LiveParam> = Vec::new();
    let mut rebuilt: Vec<LiveParam> = Vec::new();
    for param in live.drain(..) {
        match param.origin {
            ParamOrigin::Discovered => existing.push(param),
            ParamOrigin::Intrinsic => rebuilt.push(param),
        }
    }

    for (id, default) in params_in_src {
        let param = match existing.iter().position(|param| &param.id == id) {
            Some(position) => {
                let mut param = existing.remove(position);
                if param.value == param.default {
                    param.value = default.clone();
                }
                param.default = default.clone();
                param
            }
            None => LiveParam::discovered(id, default),
        };
        rebuilt.push(param);
    }

    if !existing.is_empty() {
        debug!(dropped = existing.len(), "removed stale discovered parameters");
    }
    *live = rebuilt;
}
