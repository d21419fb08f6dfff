//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `geometry/`, `hubbard/`, `utils/`
//! - 子模块: table, supercell, select, plot

pub mod plot;
pub mod select;
pub mod supercell;
pub mod table;

use crate::cli::{Commands, HubbardInputArgs};
use crate::error::Result;
use crate::models::HubbardStructure;
use crate::parsers;
use crate::utils::output;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Table(args) => table::execute(args),
        Commands::Supercell(args) => supercell::execute(args),
        Commands::Select(args) => select::execute(args),
        Commands::Plot(args) => plot::execute(args),
    }
}

/// 读取带 Hubbard 参数的输入并打印概要
fn load_hubbard_input(source: &HubbardInputArgs) -> Result<HubbardStructure> {
    let hubbard = parsers::parse_hubbard_input(&source.input, source.hubbard.as_deref())?;

    let structure = &hubbard.structure;
    output::print_success(&format!(
        "Loaded structure: {} ({}, {} atoms)",
        structure.name,
        structure.formula(),
        structure.num_sites()
    ));

    let (a, b, c, alpha, beta, gamma) = structure.lattice.parameters();
    output::print_info(&format!(
        "Cell: a={:.4} b={:.4} c={:.4} Å, α={:.2} β={:.2} γ={:.2}°, V={:.3} Å³",
        a,
        b,
        c,
        alpha,
        beta,
        gamma,
        structure.lattice.volume().abs()
    ));

    let onsite = hubbard.records.iter().filter(|r| r.is_onsite()).count();
    output::print_info(&format!(
        "Hubbard parameters: {} onsite, {} intersite",
        onsite,
        hubbard.records.len() - onsite
    ));
    if let Some(ref projectors) = hubbard.projectors {
        output::print_info(&format!("Projectors: {}", projectors));
    }
    if let Some(ref formulation) = hubbard.formulation {
        output::print_info(&format!("Formulation: {}", formulation));
    }

    Ok(hubbard)
}
