use std::process::Command;

use anyhow::{Context, Result};

/// Packages with optional features and the combinations that must compile.
const FEATURE_MATRIX: &[(&str, &[&[&str]])] = &[
    ("artistcal-domain", &[&[], &["ts-gen"]]),
    ("artistcal-app", &[&[], &["ts-gen"]]),
];

/// Check that all required feature combinations compile successfully.
pub fn test_feature_matrix() -> Result<()> {
    let total: usize = FEATURE_MATRIX.iter().map(|(_, combos)| combos.len()).sum();
    println!("Testing {total} feature combinations...");

    let mut index = 0;
    for (package, combinations) in FEATURE_MATRIX {
        for features in *combinations {
            index += 1;
            let joined = features.join(",");
            let is_default = features.is_empty();
            let display_label = if is_default {
                format!("{package}/default")
            } else {
                format!("{package}/{joined}")
            };
            let feature_arg = if is_default { None } else { Some(joined) };

            println!(
                "\n[{index}/{total}] cargo check -p {package}{}",
                feature_arg.as_ref().map(|arg| format!(" --features {arg}")).unwrap_or_default()
            );

            let mut command = Command::new("cargo");
            command.arg("check").arg("-p").arg(package);

            if let Some(feature_list) = feature_arg.as_ref() {
                command.arg("--features").arg(feature_list.as_str());
            }

            let status = command
                .status()
                .with_context(|| format!("Failed to run cargo check for '{display_label}'"))?;

            if !status.success() {
                anyhow::bail!("Feature combination '{display_label}' failed to compile");
            }

            println!("✅ Features '{display_label}' compiled successfully");
        }
    }

    println!("\n✅ All {total} feature combinations compile successfully!");

    Ok(())
}
