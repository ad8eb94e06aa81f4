use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drinks_mc::demos::production::fresh_drinks_model;
use drinks_mc::math::integer_linear::{BranchAndBoundSolver, ILPSolver, IntegerLinearProgram};

/// A knapsack-style model whose relaxation is fractional, so branching is exercised.
fn knapsack() -> IntegerLinearProgram {
    let weights = [12.0, 7.0, 11.0, 8.0, 9.0];
    let values = [24.0, 13.0, 23.0, 15.0, 16.0];
    let mut model = IntegerLinearProgram::new("knapsack");
    for i in 0..weights.len() {
        model.add_variable(format!("item{}", i), true);
    }
    model.set_objective(values.to_vec()).unwrap();
    model.add_constraint("capacity", weights.to_vec(), 26.0).unwrap();
    for i in 0..weights.len() {
        let mut row = vec![0.0; weights.len()];
        row[i] = 1.0;
        model.add_constraint(format!("take{}", i), row, 1.0).unwrap();
    }
    model
}

fn bench_branch_and_bound(c: &mut Criterion) {
    let solver = BranchAndBoundSolver::default();
    let drinks = fresh_drinks_model().unwrap();
    let knapsack = knapsack();

    c.bench_function("fresh_drinks", |b| b.iter(|| solver.solve(black_box(&drinks)).unwrap()));
    c.bench_function("knapsack_5", |b| b.iter(|| solver.solve(black_box(&knapsack)).unwrap()));
}

criterion_group!(benches, bench_branch_and_bound);
criterion_main!(benches);
