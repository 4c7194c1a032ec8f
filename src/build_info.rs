//! Compile-time build information, shown in the simulator banner.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `"<commit> (<date>)"` for banners and logs.
pub fn build_label() -> String {
    format!("{} ({})", BUILD_COMMIT, BUILD_DATE)
}
