//! Integration tests for the `arch_conform::architecture_tests!()` macro.
//!
//! These tests verify that the macro generates one test per rule and that
//! the runner evaluates the demo application's model with its configuration.

// Strict preset (from the config file) against the demo application.
mod demo_application {
    arch_conform::architecture_tests!(config = "demos/spring-demo/arch-conform.toml");
}

// Explicit rule list, by name and by code, bypasses the preset.
mod selected_rules {
    arch_conform::architecture_tests!(
        config = "demos/spring-demo/arch-conform.toml",
        preset = "minimal",
        fail_on = "error",
        rules = ["no-field-injection", "AC006", "services-independent"],
    );
}
