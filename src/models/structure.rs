//! # 晶体结构数据模型
//!
//! 定义统一的周期性晶体结构表示：晶格向量 + 笛卡尔坐标原子位点。
//! 位点在 `sites` 中的下标即约化胞原子序号（从 0 开始）。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`geometry/`、`hubbard/` 使用
//! - 无外部模块依赖

use serde::Deserialize;

/// 晶格参数表示
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格
    /// 角度单位：度
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let cos_alpha = alpha.to_radians().cos();
        let cos_beta = beta.to_radians().cos();
        let cos_gamma = gamma.to_radians().cos();
        let sin_gamma = gamma.to_radians().sin();

        let c1 = c * cos_beta;
        let c2 = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c3 = (c * c - c1 * c1 - c2 * c2).sqrt();

        Lattice {
            matrix: [
                [a, 0.0, 0.0],
                [b * cos_gamma, b * sin_gamma, 0.0],
                [c1, c2, c3],
            ],
        }
    }

    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a_vec, b_vec, c_vec] = self.matrix;

        let a = norm(a_vec);
        let b = norm(b_vec);
        let c = norm(c_vec);

        let alpha = (dot(b_vec, c_vec) / (b * c)).acos().to_degrees();
        let beta = (dot(a_vec, c_vec) / (a * c)).acos().to_degrees();
        let gamma = (dot(a_vec, b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积（有符号）
    pub fn volume(&self) -> f64 {
        determinant(&self.matrix)
    }

    /// 整数平移向量对应的笛卡尔位移 `translation · cell`
    ///
    /// 平移分量可以是任意整数，不限于 {-1, 0, 1}。
    pub fn cartesian_offset(&self, translation: [i32; 3]) -> [f64; 3] {
        self.frac_to_cart([
            translation[0] as f64,
            translation[1] as f64,
            translation[2] as f64,
        ])
    }

    /// 分数坐标转笛卡尔坐标
    pub fn frac_to_cart(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }

    /// 笛卡尔坐标转分数坐标
    ///
    /// 晶格退化（行列式接近 0）时原样返回。
    pub fn cart_to_frac(&self, cart: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        let det = determinant(&m);

        if det.abs() < 1e-10 {
            return cart;
        }

        // 行向量约定：cart = frac · M  =>  frac = cart · M^-1
        let inv = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ];

        [
            cart[0] * inv[0][0] + cart[1] * inv[1][0] + cart[2] * inv[2][0],
            cart[0] * inv[0][1] + cart[1] * inv[1][1] + cart[2] * inv[2][1],
            cart[0] * inv[0][2] + cart[1] * inv[1][2] + cart[2] * inv[2][2],
        ]
    }

    /// 沿每个晶格方向独立缩放
    pub fn scaled(&self, factors: [f64; 3]) -> Lattice {
        let mut matrix = self.matrix;
        for (row, factor) in matrix.iter_mut().zip(factors) {
            for x in row.iter_mut() {
                *x *= factor;
            }
        }
        Lattice { matrix }
    }
}

/// 原子位点
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Site {
    /// Kind 名称（通常为元素符号，可带编号，如 "Fe1"）
    pub kind_name: String,

    /// 笛卡尔坐标 [x, y, z]（Å）
    pub position: [f64; 3],
}

impl Site {
    pub fn new(kind_name: impl Into<String>, position: [f64; 3]) -> Self {
        Site {
            kind_name: kind_name.into(),
            position,
        }
    }

    /// 笛卡尔平移后的副本
    pub fn translated(&self, offset: [f64; 3]) -> Self {
        Site {
            kind_name: self.kind_name.clone(),
            position: [
                self.position[0] + offset[0],
                self.position[1] + offset[1],
                self.position[2] + offset[2],
            ],
        }
    }
}

/// 晶体结构
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    /// 结构名称
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 原子位点列表
    pub sites: Vec<Site>,
}

impl Structure {
    pub fn new(name: impl Into<String>, lattice: Lattice, sites: Vec<Site>) -> Self {
        Structure {
            name: name.into(),
            lattice,
            sites,
        }
    }

    /// 原子数
    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for site in &self.sites {
            *counts.entry(site.kind_name.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(kind, count)| {
                if count == 1 {
                    kind.to_string()
                } else {
                    format!("{}{}", kind, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 第一个具有给定 kind 名称的位点序号
    pub fn first_site_of_kind(&self, kind_name: &str) -> Option<usize> {
        self.sites.iter().position(|s| s.kind_name == kind_name)
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

fn determinant(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}
