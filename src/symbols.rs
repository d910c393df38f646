//! Read-only registries of the operators, functions and constants the
//! evaluator knows about.
//!
//! The tables are compile-time perfect-hash maps, so they can be shared by
//! any number of evaluations without synchronisation.

use std::f64::consts;

use phf::phf_map;

pub type BinaryFn = fn(f64, f64) -> f64;
pub type UnaryFn = fn(f64) -> f64;

static OPERATORS: phf::Map<char, BinaryFn> = phf_map! {
    '+' => add,
    '-' => sub,
    '*' => mul,
    '/' => div,
    '%' => rem,
    '^' => pow,
};

static FUNCTIONS: phf::Map<&'static str, UnaryFn> = phf_map! {
    "sin" => f64::sin,
    "cos" => f64::cos,
    "tan" => f64::tan,
    "sqrt" => sqrt,
    "ln" => ln,
    "log" => ln,
    "lg" => log10,
    "log10" => log10,
    "lb" => log2,
    "log2" => log2,
};

// Keys are lowercase; lookups fold case first.
static CONSTANTS: phf::Map<&'static str, f64> = phf_map! {
    "e" => consts::E,
    "pi" => consts::PI,
    "tau" => consts::TAU,
    "inf" => f64::INFINITY,
    "nan" => f64::NAN,
};

pub fn operator(op: char) -> Option<BinaryFn> {
    OPERATORS.get(&op).copied()
}

pub fn function(name: &str) -> Option<UnaryFn> {
    FUNCTIONS.get(name).copied()
}

pub fn constant(name: &str) -> Option<f64> {
    CONSTANTS.get(name.to_lowercase().as_str()).copied()
}

/// Known function names, sorted.
pub fn function_names() -> Vec<&'static str> {
    let mut names: Vec<_> = FUNCTIONS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Known constant names, sorted.
pub fn constant_names() -> Vec<&'static str> {
    let mut names: Vec<_> = CONSTANTS.keys().copied().collect();
    names.sort_unstable();
    names
}

fn add(a: f64, b: f64) -> f64 {
    a + b
}

fn sub(a: f64, b: f64) -> f64 {
    a - b
}

fn mul(a: f64, b: f64) -> f64 {
    a * b
}

fn div(a: f64, b: f64) -> f64 {
    if b == 0.0 { f64::NAN } else { a / b }
}

/// Floored modulo: the result takes the sign of the divisor.
fn rem(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return f64::NAN;
    }
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r }
}

fn pow(a: f64, b: f64) -> f64 {
    a.powf(b)
}

fn sqrt(a: f64) -> f64 {
    if a < 0.0 { f64::NAN } else { a.sqrt() }
}

fn ln(a: f64) -> f64 {
    if a <= 0.0 { f64::NAN } else { a.ln() }
}

fn log10(a: f64) -> f64 {
    if a <= 0.0 { f64::NAN } else { a.log10() }
}

fn log2(a: f64) -> f64 {
    if a <= 0.0 { f64::NAN } else { a.log2() }
}
