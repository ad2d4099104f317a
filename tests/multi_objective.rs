//! Bi-objective runs: NSGA-II on ZDT1, SMS-EMOA on Schaffer's problem,
//! constrained search, reproducibility and pooled evaluation.

use rand::Rng;
use u_evo::ea::{CrossoverAndMutation, EaConfig, EaRunner};
use u_evo::operators::{PolynomialMutation, SbxCrossover};
use u_evo::{
    dominates, BoundedArchive, DensityEstimator, Hypervolume, Problem, ProblemError, Ranking,
    Solution, SolutionListOutput,
};

struct Zdt1 {
    n: usize,
}

impl Problem for Zdt1 {
    type Variable = f64;

    fn name(&self) -> &str {
        "ZDT1"
    }

    fn number_of_variables(&self) -> usize {
        self.n
    }

    fn number_of_objectives(&self) -> usize {
        2
    }

    fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<f64> {
        Solution::new((0..self.n).map(|_| rng.random_range(0.0..1.0)).collect(), 2, 0)
    }

    fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), ProblemError> {
        let x = solution.variables();
        let f1 = x[0];
        let g = 1.0 + 9.0 * x[1..].iter().sum::<f64>() / (self.n - 1) as f64;
        let f2 = g * (1.0 - (f1 / g).sqrt());
        solution.set_objective(0, f1);
        solution.set_objective(1, f2);
        Ok(())
    }
}

/// Schaffer's problem with an optional lower bound `x >= bound` expressed as
/// the constraint `x - bound >= 0`.
struct Schaffer {
    bound: Option<f64>,
}

impl Problem for Schaffer {
    type Variable = f64;

    fn number_of_variables(&self) -> usize {
        1
    }

    fn number_of_objectives(&self) -> usize {
        2
    }

    fn number_of_constraints(&self) -> usize {
        usize::from(self.bound.is_some())
    }

    fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<f64> {
        Solution::new(
            vec![rng.random_range(-5.0..5.0)],
            2,
            self.number_of_constraints(),
        )
    }

    fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), ProblemError> {
        let x = solution.variables()[0];
        solution.set_objective(0, x * x);
        solution.set_objective(1, (x - 2.0) * (x - 2.0));
        if let Some(bound) = self.bound {
            solution.set_constraint(0, x - bound);
        }
        Ok(())
    }
}

fn real_variation(
    n: usize,
    lower: f64,
    upper: f64,
) -> CrossoverAndMutation<SbxCrossover, PolynomialMutation> {
    CrossoverAndMutation::new(
        SbxCrossover::new(0.9, 20.0, vec![(lower, upper); n]).unwrap(),
        PolynomialMutation::new(1.0 / n as f64, 20.0, vec![(lower, upper); n]).unwrap(),
    )
}

fn objectives<'a>(solutions: impl IntoIterator<Item = &'a Solution<f64>>) -> Vec<Vec<f64>> {
    solutions
        .into_iter()
        .map(|s| s.objectives().to_vec())
        .collect()
}

#[test]
fn nsga2_approximates_zdt1_front() {
    let problem = Zdt1 { n: 10 };
    let config = EaConfig::nsga2(40)
        .with_max_evaluations(10_000)
        .with_parallel(false)
        .with_seed(12345);
    let result = EaRunner::run(&problem, &real_variation(10, 0.0, 1.0), &config).unwrap();

    assert_eq!(result.population.len(), 40);
    let front = objectives(result.non_dominated());
    for (i, a) in front.iter().enumerate() {
        for (j, b) in front.iter().enumerate() {
            assert!(i == j || !dominates(a, b), "{a:?} dominates {b:?}");
        }
    }

    // The true front dominates 2/3 of the unit square.
    let hv = Hypervolume::new(vec![1.0, 1.0]).unwrap().compute(&front).unwrap();
    assert!(hv > 0.5, "hypervolume {hv}");
    assert!(hv <= 2.0 / 3.0 + 1e-9);
}

#[test]
fn sms_emoa_covers_schaffer_front() {
    let problem = Schaffer { bound: None };
    let config = EaConfig::sms_emoa(20)
        .with_max_evaluations(3_000)
        .with_parallel(false)
        .with_seed(99);
    let result = EaRunner::run(&problem, &real_variation(1, -5.0, 5.0), &config).unwrap();

    assert_eq!(result.evaluations, 3_000);
    assert_eq!(result.generations, 2_980);
    // Area dominated by the true front within [0, 4]^2 is 40/3.
    let hv = Hypervolume::new(vec![4.0, 4.0])
        .unwrap()
        .compute(&objectives(&result.population))
        .unwrap();
    assert!(hv > 12.0, "hypervolume {hv}");
}

#[test]
fn constrained_front_is_feasible() {
    let problem = Schaffer { bound: Some(1.0) };
    let config = EaConfig::nsga2(20)
        .with_max_evaluations(2_000)
        .with_parallel(false)
        .with_seed(5);
    let result = EaRunner::run(&problem, &real_variation(1, -5.0, 5.0), &config).unwrap();

    for s in result.non_dominated() {
        assert!(s.is_feasible(), "infeasible survivor {:?}", s.variables());
        assert!(s.variables()[0] >= 1.0);
    }
}

#[test]
fn same_seed_reproduces_every_generation() {
    let problem = Zdt1 { n: 6 };
    let config = EaConfig::nsga2(16)
        .with_max_evaluations(1_600)
        .with_parallel(false)
        .with_seed(77);
    let variation = real_variation(6, 0.0, 1.0);

    let a = EaRunner::run(&problem, &variation, &config).unwrap();
    let b = EaRunner::run(&problem, &variation, &config).unwrap();
    assert_eq!(a.population, b.population);
    assert_eq!(a.history, b.history);

    let c = EaRunner::run(&problem, &variation, &config.clone().with_seed(78)).unwrap();
    assert_ne!(a.population, c.population);
}

#[test]
fn pooled_evaluation_matches_sequential() {
    let problem = Zdt1 { n: 6 };
    let variation = real_variation(6, 0.0, 1.0);
    let sequential = EaConfig::sms_emoa(12)
        .with_max_evaluations(400)
        .with_parallel(false)
        .with_seed(3);
    let pooled = sequential.clone().with_worker_threads(4);

    let a = EaRunner::run(&problem, &variation, &sequential).unwrap();
    let b = EaRunner::run(&problem, &variation, &pooled).unwrap();
    assert_eq!(a.population, b.population);
    assert_eq!(a.evaluations, b.evaluations);
}

#[test]
fn final_population_feeds_archive_and_output() {
    let problem = Zdt1 { n: 6 };
    let config = EaConfig::nsga2(30)
        .with_max_evaluations(1_500)
        .with_parallel(false)
        .with_seed(8);
    let result = EaRunner::run(&problem, &real_variation(6, 0.0, 1.0), &config).unwrap();

    let mut archive = BoundedArchive::new(10, DensityEstimator::hypervolume_contribution()).unwrap();
    for s in &result.population {
        archive.add(s.clone()).unwrap();
    }
    assert!(archive.len() <= 10);
    let archived = objectives(archive.solutions());
    let ranking = Ranking::from_objectives(&archived).unwrap();
    assert_eq!(ranking.number_of_fronts(), 1);

    let mut var = Vec::new();
    let mut fun = Vec::new();
    let output = SolutionListOutput::new();
    output.write_variables(archive.solutions(), &mut var).unwrap();
    output.write_objectives(archive.solutions(), &mut fun).unwrap();
    let var = String::from_utf8(var).unwrap();
    let fun = String::from_utf8(fun).unwrap();
    assert_eq!(var.lines().count(), archive.len());
    assert_eq!(fun.lines().count(), archive.len());
    assert!(var.lines().all(|row| row.split('\t').count() == 6));
    assert!(fun.lines().all(|row| row.split('\t').count() == 2));
}
