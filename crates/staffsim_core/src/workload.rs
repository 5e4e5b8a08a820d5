//! Workload accumulator: one simulated shift for one scenario

use rand::Rng;
use serde::Serialize;

use crate::error::Result;
use crate::model::{OccurrenceKind, Role, StaffingScenario, TaskProfileSet};
use crate::sampler::TaskSampler;

/// Minutes of work each role accumulated in one simulated shift
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ShiftWorkload {
    pub primary_minutes: f64,
    pub secondary_minutes: f64,
}

impl ShiftWorkload {
    pub fn get(&self, role: Role) -> f64 {
        match role {
            Role::Primary => self.primary_minutes,
            Role::Secondary => self.secondary_minutes,
        }
    }

    fn add(&mut self, role: Role, minutes: f64) {
        match role {
            Role::Primary => self.primary_minutes += minutes,
            Role::Secondary => self.secondary_minutes += minutes,
        }
    }

    /// Did this role finish inside the shift?
    pub fn fits(&self, role: Role, capacity_minutes: f64) -> bool {
        self.get(role) <= capacity_minutes
    }

    /// Both roles finished inside the shift
    pub fn completed(&self, capacity_minutes: f64) -> bool {
        Role::ALL.iter().all(|&role| self.fits(role, capacity_minutes))
    }
}

/// Task samplers bound to one scenario's ratios.
///
/// Built once per scenario and shared read-only by every iteration.
#[derive(Debug, Clone)]
pub struct WorkloadModel<'a> {
    samplers: Vec<TaskSampler<'a>>,
    primary_ratio: u32,
    secondary_ratio: u32,
}

impl<'a> WorkloadModel<'a> {
    pub fn new(scenario: &StaffingScenario, profiles: &'a TaskProfileSet) -> Result<Self> {
        let samplers = profiles
            .iter()
            .map(TaskSampler::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            samplers,
            primary_ratio: scenario.primary_ratio(),
            secondary_ratio: scenario.secondary_ratio(),
        })
    }

    fn ratio(&self, role: Role) -> u32 {
        match role {
            Role::Primary => self.primary_ratio,
            Role::Secondary => self.secondary_ratio,
        }
    }

    /// Sum sampled durations per role for one shift.
    ///
    /// Once-per-shift tasks contribute one sample unconditionally. Per-patient
    /// tasks get an independent Bernoulli trial for each of the `ratio`
    /// patients assigned to that role, and a fresh duration on each success.
    pub fn sample_shift<R: Rng + ?Sized>(&self, rng: &mut R) -> ShiftWorkload {
        let mut workload = ShiftWorkload::default();
        for sampler in &self.samplers {
            let role = sampler.role();
            match sampler.kind() {
                OccurrenceKind::OncePerShift => {
                    workload.add(role, sampler.sample_duration(rng));
                }
                OccurrenceKind::PerAssignedPatient => {
                    for _ in 0..self.ratio(role) {
                        if sampler.occurs(rng) {
                            workload.add(role, sampler.sample_duration(rng));
                        }
                    }
                }
            }
        }
        workload
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::TaskProfileBuilder;

    fn profiles() -> TaskProfileSet {
        TaskProfileSet::new(vec![
            TaskProfileBuilder::once_per_shift("Handoff")
                .primary()
                .range(20.0, 30.0)
                .std_dev(0.0)
                .build()
                .unwrap(),
            TaskProfileBuilder::per_patient("Assessment")
                .primary()
                .range(10.0, 20.0)
                .std_dev(0.0)
                .frequency(1.0)
                .build()
                .unwrap(),
            TaskProfileBuilder::per_patient("Vitals")
                .secondary()
                .range(4.0, 6.0)
                .std_dev(0.0)
                .frequency(1.0)
                .build()
                .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_deterministic_totals() {
        let profiles = profiles();
        let scenario = StaffingScenario::new(4, 10, 8.0).unwrap();
        let model = WorkloadModel::new(&scenario, &profiles).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);

        let shift = model.sample_shift(&mut rng);
        // handoff once (25) + 4 assessments (15 each)
        assert_eq!(shift.primary_minutes, 25.0 + 4.0 * 15.0);
        // 10 vitals at 5 minutes
        assert_eq!(shift.secondary_minutes, 50.0);
        assert!(shift.completed(scenario.shift_minutes()));
    }

    #[test]
    fn test_once_per_shift_ignores_ratio() {
        let profiles = TaskProfileSet::new(vec![
            TaskProfileBuilder::once_per_shift("Chart Review")
                .secondary()
                .range(10.0, 20.0)
                .std_dev(0.0)
                .frequency(0.1)
                .build()
                .unwrap(),
        ])
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(5);
        for ratio in [1, 5, 20] {
            let scenario = StaffingScenario::new(1, ratio, 8.0).unwrap();
            let model = WorkloadModel::new(&scenario, &profiles).unwrap();
            let shift = model.sample_shift(&mut rng);
            assert_eq!(shift.secondary_minutes, 15.0);
            assert_eq!(shift.primary_minutes, 0.0);
        }
    }

    #[test]
    fn test_per_patient_frequency_scales_workload() {
        let profiles = TaskProfileSet::new(vec![
            TaskProfileBuilder::per_patient("Toileting")
                .secondary()
                .range(5.0, 15.0)
                .std_dev(0.0)
                .frequency(0.25)
                .build()
                .unwrap(),
        ])
        .unwrap();
        let scenario = StaffingScenario::new(1, 8, 8.0).unwrap();
        let model = WorkloadModel::new(&scenario, &profiles).unwrap();
        let mut rng = SmallRng::seed_from_u64(9);

        let n = 10_000;
        let mean = (0..n)
            .map(|_| model.sample_shift(&mut rng).secondary_minutes)
            .sum::<f64>()
            / n as f64;
        // 8 patients * 0.25 * 10 minutes
        assert!((mean - 20.0).abs() < 1.0, "mean workload {mean}");
    }

    #[test]
    fn test_overrun_detection() {
        let shift = ShiftWorkload {
            primary_minutes: 470.0,
            secondary_minutes: 490.0,
        };
        assert!(shift.fits(Role::Primary, 480.0));
        assert!(!shift.fits(Role::Secondary, 480.0));
        assert!(!shift.completed(480.0));
        assert!(shift.completed(490.0));
    }
}
