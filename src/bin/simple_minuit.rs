//! Minimize `x²` from `x = 1` with an error definition of `0.5`, printing
//! each evaluation and then the minimum.
use anyhow::Result;
use rust_minuit::{
    minuit::{MnApplication, MnMigrad, MnStrategy, MnUserParameters},
    optimization::{
        errors::OptResult,
        migrad::{Cost, FCN, Theta},
    },
};

struct SimpleFcn;

impl FCN for SimpleFcn {
    fn value(&self, v: &Theta) -> OptResult<Cost> {
        println!("val = {}", v[0]);
        Ok(v[0] * v[0])
    }

    fn up(&self) -> f64 {
        0.5
    }
}

fn main() -> Result<()> {
    let mut upar = MnUserParameters::new();
    upar.add_with_step("x", 1.0, 0.1)?;

    let mut migrad = MnMigrad::new(&SimpleFcn, upar, MnStrategy::default());
    let minimum = migrad.minimize_default()?;
    println!("{minimum}");
    Ok(())
}
