//! Report rendering: tables, JSON and YAML.
//!
//! The aggregate records arrive finalized from `capacity-lib`; this module
//! only formats them. Machine formats (`json`, `yaml`) serialize the records
//! as-is with quantity strings; table output offers a compact column set by
//! default, the full set with `--default-format`, and human-readable units
//! with `--readable`.

use anyhow::Result;
use capacity_lib::{ClusterCapacityData, NodeRoleCapacity, ResourceAmount};
use clap::{Args, ValueEnum};
use tabled::settings::object::Rows;
use tabled::settings::{Disable, Style};
use tabled::{Table, Tabled};

/// Output format for report rendering.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Display flags, shared by every subcommand.
#[derive(Args, Debug)]
pub struct DisplayArgs {
    /// Display CPU in cores and memory in Gi/Mi instead of raw units
    #[arg(long, short = 'r')]
    pub readable: bool,

    /// Show the full column set instead of the compact default
    #[arg(long = "default-format", short = 'd')]
    pub default_format: bool,

    /// Omit the header row from table output
    #[arg(long = "no-headers")]
    pub no_headers: bool,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Compact column set: the figures an operator checks first.
#[derive(Tabled)]
struct CapacityRow {
    #[tabled(rename = "NODES")]
    nodes: i64,
    #[tabled(rename = "READY")]
    ready: i64,
    #[tabled(rename = "PODS")]
    pods: i64,
    #[tabled(rename = "PODS AVAIL")]
    pods_available: i64,
    #[tabled(rename = "CPU REQUESTS")]
    cpu_requests: String,
    #[tabled(rename = "CPU AVAIL")]
    cpu_available: String,
    #[tabled(rename = "MEM REQUESTS")]
    memory_requests: String,
    #[tabled(rename = "MEM AVAIL")]
    memory_available: String,
}

/// Full column set (`--default-format`).
#[derive(Tabled)]
struct WideCapacityRow {
    #[tabled(rename = "NODES")]
    nodes: i64,
    #[tabled(rename = "READY")]
    ready: i64,
    #[tabled(rename = "UNREADY")]
    unready: i64,
    #[tabled(rename = "UNSCHEDULABLE")]
    unschedulable: i64,
    #[tabled(rename = "PODS")]
    pods: i64,
    #[tabled(rename = "NONTERM PODS")]
    non_term_pods: i64,
    #[tabled(rename = "PODS CAP")]
    pods_capacity: String,
    #[tabled(rename = "PODS ALLOC")]
    pods_allocatable: String,
    #[tabled(rename = "PODS AVAIL")]
    pods_available: i64,
    #[tabled(rename = "CPU CAP")]
    cpu_capacity: String,
    #[tabled(rename = "CPU ALLOC")]
    cpu_allocatable: String,
    #[tabled(rename = "CPU REQUESTS")]
    cpu_requests: String,
    #[tabled(rename = "CPU LIMITS")]
    cpu_limits: String,
    #[tabled(rename = "CPU AVAIL")]
    cpu_available: String,
    #[tabled(rename = "MEM CAP")]
    memory_capacity: String,
    #[tabled(rename = "MEM ALLOC")]
    memory_allocatable: String,
    #[tabled(rename = "MEM REQUESTS")]
    memory_requests: String,
    #[tabled(rename = "MEM LIMITS")]
    memory_limits: String,
    #[tabled(rename = "MEM AVAIL")]
    memory_available: String,
}

/// Compact row prefixed with the role name.
#[derive(Tabled)]
struct RoleCapacityRow {
    #[tabled(rename = "ROLE")]
    role: String,
    #[tabled(inline)]
    data: CapacityRow,
}

/// Wide row prefixed with the role name.
#[derive(Tabled)]
struct WideRoleCapacityRow {
    #[tabled(rename = "ROLE")]
    role: String,
    #[tabled(inline)]
    data: WideCapacityRow,
}

/// Format a CPU quantity: raw millicores, or cores with `--readable`.
pub fn format_cpu(amount: ResourceAmount, readable: bool) -> String {
    if readable {
        format_cores(amount)
    } else {
        format!("{}m", amount.to_milli())
    }
}

/// Format a memory quantity: raw bytes, or Gi/Mi with `--readable`.
pub fn format_memory(amount: ResourceAmount, readable: bool) -> String {
    if readable {
        const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
        const MIB: f64 = 1024.0 * 1024.0;
        let bytes = amount.to_f64();
        if bytes.abs() >= GIB {
            format!("{:.1}Gi", bytes / GIB)
        } else {
            format!("{:.1}Mi", bytes / MIB)
        }
    } else {
        amount.to_string()
    }
}

/// Render millicores as a decimal core count with trailing zeros trimmed.
fn format_cores(amount: ResourceAmount) -> String {
    let milli = amount.to_milli();
    let sign = if milli < 0 { "-" } else { "" };
    let magnitude = milli.unsigned_abs();
    let whole = magnitude / 1000;
    let frac = magnitude % 1000;
    if frac == 0 {
        format!("{sign}{whole}")
    } else {
        let frac = format!("{frac:03}");
        format!("{sign}{whole}.{}", frac.trim_end_matches('0'))
    }
}

fn capacity_row(data: &ClusterCapacityData, readable: bool) -> CapacityRow {
    CapacityRow {
        nodes: data.total_node_count,
        ready: data.total_ready_node_count,
        pods: data.total_pod_count,
        pods_available: data.total_available_pods,
        cpu_requests: format_cpu(data.total_requests_cpu, readable),
        cpu_available: format_cpu(data.total_available_cpu, readable),
        memory_requests: format_memory(data.total_requests_memory, readable),
        memory_available: format_memory(data.total_available_memory, readable),
    }
}

fn wide_capacity_row(data: &ClusterCapacityData, readable: bool) -> WideCapacityRow {
    WideCapacityRow {
        nodes: data.total_node_count,
        ready: data.total_ready_node_count,
        unready: data.total_unready_node_count,
        unschedulable: data.total_unschedulable_node_count,
        pods: data.total_pod_count,
        non_term_pods: data.total_non_term_pod_count,
        pods_capacity: data.total_capacity_pods.to_string(),
        pods_allocatable: data.total_allocatable_pods.to_string(),
        pods_available: data.total_available_pods,
        cpu_capacity: format_cpu(data.total_capacity_cpu, readable),
        cpu_allocatable: format_cpu(data.total_allocatable_cpu, readable),
        cpu_requests: format_cpu(data.total_requests_cpu, readable),
        cpu_limits: format_cpu(data.total_limits_cpu, readable),
        cpu_available: format_cpu(data.total_available_cpu, readable),
        memory_capacity: format_memory(data.total_capacity_memory, readable),
        memory_allocatable: format_memory(data.total_allocatable_memory, readable),
        memory_requests: format_memory(data.total_requests_memory, readable),
        memory_limits: format_memory(data.total_limits_memory, readable),
        memory_available: format_memory(data.total_available_memory, readable),
    }
}

fn render_table<T: Tabled>(rows: Vec<T>, no_headers: bool) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    if no_headers {
        table.with(Disable::row(Rows::first()));
    }
    table.to_string()
}

/// Render the whole-cluster record.
pub fn display_cluster_data(data: &ClusterCapacityData, args: &DisplayArgs) -> Result<()> {
    match args.output {
        OutputFormat::Table => {
            let table = if args.default_format {
                render_table(vec![wide_capacity_row(data, args.readable)], args.no_headers)
            } else {
                render_table(vec![capacity_row(data, args.readable)], args.no_headers)
            };
            println!("{table}");
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(data)?),
    }
    Ok(())
}

/// Render the per-role records in their stable role-name order.
pub fn display_node_role_data(report: &NodeRoleCapacity, args: &DisplayArgs) -> Result<()> {
    match args.output {
        OutputFormat::Table => {
            let table = if args.default_format {
                let rows: Vec<WideRoleCapacityRow> = report
                    .role_names
                    .iter()
                    .map(|role| WideRoleCapacityRow {
                        role: role.clone(),
                        data: wide_capacity_row(&report.by_role[role], args.readable),
                    })
                    .collect();
                render_table(rows, args.no_headers)
            } else {
                let rows: Vec<RoleCapacityRow> = report
                    .role_names
                    .iter()
                    .map(|role| RoleCapacityRow {
                        role: role.clone(),
                        data: capacity_row(&report.by_role[role], args.readable),
                    })
                    .collect();
                render_table(rows, args.no_headers)
            };
            println!("{table}");
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.by_role)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&report.by_role)?),
    }
    Ok(())
}
