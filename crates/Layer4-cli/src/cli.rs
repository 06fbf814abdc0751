//! Command handlers - 각 서브커맨드의 출력

use anyhow::{bail, Context, Result};
use pluggable_core::{Pipeline, PipelineOutcome, PluginDescriptor, PluginManager};
use serde_json::Value;

/// 등록된 플러그인 목록
pub async fn list(manager: &PluginManager) -> Result<()> {
    let plugins = manager.list_all().await;

    println!(
        "{:<26} {:<9} {:<12} {:>8}  {}",
        "ID", "KIND", "STATUS", "PRIORITY", "DEPENDS ON"
    );
    for plugin in &plugins {
        println!(
            "{:<26} {:<9} {:<12} {:>8}  {}",
            plugin.id(),
            plugin.capability.to_string(),
            plugin.status.to_string(),
            plugin.priority(),
            dependency_list(plugin)
        );
    }

    let summary = manager.summary().await;
    println!(
        "\n{} plugins ({} active, {} inactive, {} error)",
        summary.total, summary.active, summary.inactive, summary.error
    );
    Ok(())
}

/// 한 플러그인의 의존 관계
pub async fn graph(manager: &PluginManager, id: &str) -> Result<()> {
    let plugin = manager.get_plugin(id).await?;

    println!("{} v{} [{}]", plugin.name(), plugin.manifest.version, plugin.status);
    if !plugin.manifest.description.is_empty() {
        println!("  {}", plugin.manifest.description);
    }
    if let Some(last_error) = &plugin.last_error {
        println!("  last error ({}): {}", last_error.phase, last_error.message);
    }

    println!("\ndepends on:");
    // 미등록 의존성도 보여주기 위해 선언 목록 사용
    let dependencies = plugin.dependencies();
    if dependencies.is_empty() {
        println!("  (none)");
    }
    for dependency in dependencies {
        let status = manager
            .status(dependency)
            .await
            .map(|s| s.to_string())
            .unwrap_or_else(|| "missing".to_string());
        println!("  {} [{}]", dependency, status);
    }

    println!("\ndepended on by:");
    let dependents = manager.dependents_of(id).await;
    if dependents.is_empty() {
        println!("  (none)");
    }
    for dependent in &dependents {
        println!("  {}", dependent);
    }

    let blockers: Vec<_> = manager
        .blocking_dependents(id)
        .await
        .into_iter()
        .map(|d| d.manifest.id)
        .collect();
    println!("\nactivatable: {}", manager.is_activatable(id).await);
    if !blockers.is_empty() {
        println!("removal blocked by: {}", blockers.join(", "));
    }
    Ok(())
}

/// 파이프라인 실행
pub async fn run(
    manager: &PluginManager,
    input: &str,
    parse_json: bool,
    deactivate: &[String],
    by_priority: bool,
) -> Result<()> {
    for id in deactivate {
        manager
            .deactivate(id)
            .await
            .with_context(|| format!("failed to deactivate {}", id))?;
    }

    let input = if parse_json {
        serde_json::from_str(input).context("input is not valid JSON")?
    } else {
        Value::String(input.to_string())
    };

    let mut pipeline = Pipeline::new(manager.clone());
    if by_priority {
        pipeline = pipeline.ordered_by_priority();
    }

    match pipeline.run(input).await? {
        PipelineOutcome::Completed { output, applied } => {
            println!("{}", output);
            eprintln!("\n[applied: {}]", applied.join(" → "));
            Ok(())
        }
        PipelineOutcome::Rejected { validator, errors } => {
            bail!("rejected by {}: {}", validator, errors.join("; "))
        }
    }
}

/// 연산 플러그인 실행
pub async fn calc(manager: &PluginManager, operation: &str, operands: &[f64]) -> Result<()> {
    let result = Pipeline::new(manager.clone())
        .execute(operation, operands)
        .await?;
    println!("{}", result);
    Ok(())
}

fn dependency_list(plugin: &PluginDescriptor) -> String {
    if plugin.dependencies().is_empty() {
        "-".to_string()
    } else {
        plugin.dependencies().join(", ")
    }
}
