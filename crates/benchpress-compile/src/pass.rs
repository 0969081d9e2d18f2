//! Pass trait and types for compilation passes.

use benchpress_ir::CircuitDag;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// The kind of compilation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Reads the DAG and writes only to the `PropertySet`.
    Analysis,
    /// Rewrites the DAG.
    Transformation,
}

/// A compilation pass that operates on a circuit DAG.
///
/// Passes are stateless. Everything a pass learns about the circuit goes
/// into the [`PropertySet`], which is rebuilt for every compilation, so a
/// pipeline can be shared across threads and reused across repetitions.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass on the given DAG.
    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()>;

    /// Check if this pass should run based on current state.
    fn should_run(&self, _dag: &CircuitDag, _properties: &PropertySet) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountOps;

    #[derive(Debug, PartialEq)]
    struct OpCount(usize);

    impl Pass for CountOps {
        fn name(&self) -> &'static str {
            "CountOps"
        }

        fn kind(&self) -> PassKind {
            PassKind::Analysis
        }

        fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
            properties.insert(OpCount(dag.num_ops()));
            Ok(())
        }
    }

    #[test]
    fn test_analysis_pass_writes_property() {
        let mut dag = benchpress_ir::Circuit::bell().unwrap().into_dag();
        let mut props = PropertySet::new();
        CountOps.run(&mut dag, &mut props).unwrap();

        assert_eq!(CountOps.kind(), PassKind::Analysis);
        assert_eq!(props.get::<OpCount>(), Some(&OpCount(4)));
    }
}
