/// Backstory planning and assembly.
///
/// The number of siblings and the character's gender are drawn before the
/// text model is asked anything, because they decide which tags the prompt
/// requests. The assembler then reads exactly those tags.

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::extract::{require_age, require_status, require_text, ExtractError};
use crate::core::vocabulary::{self, SiblingTags};
use crate::schema::backstory::{BackstoryResult, Gender, ParentRecord, SiblingRecord};

#[derive(Debug, Error)]
pub enum DistributionError {
    #[error("sibling distribution has no entries")]
    Empty,
    #[error("invalid sibling weights: {0}")]
    Weights(#[from] rand::distributions::WeightedError),
}

/// One row of the sibling-count table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingWeight {
    pub count: usize,
    pub weight: u32,
}

/// Weighted table of how many older siblings a new character gets.
#[derive(Debug, Clone)]
pub struct SiblingDistribution {
    entries: Vec<SiblingWeight>,
    index: WeightedIndex<u32>,
}

impl SiblingDistribution {
    /// The default table, in quarter-percent units: 0 → 10%, 1 → 20%,
    /// 2 → 40%, 3 → 20%, 4 → 7%, and the 3% tail split evenly over
    /// 5, 6, 8 and 10.
    pub const DEFAULT_WEIGHTS: [SiblingWeight; 9] = [
        SiblingWeight { count: 0, weight: 40 },
        SiblingWeight { count: 1, weight: 80 },
        SiblingWeight { count: 2, weight: 160 },
        SiblingWeight { count: 3, weight: 80 },
        SiblingWeight { count: 4, weight: 28 },
        SiblingWeight { count: 5, weight: 3 },
        SiblingWeight { count: 6, weight: 3 },
        SiblingWeight { count: 8, weight: 3 },
        SiblingWeight { count: 10, weight: 3 },
    ];

    pub fn new(entries: Vec<SiblingWeight>) -> Result<Self, DistributionError> {
        if entries.is_empty() {
            return Err(DistributionError::Empty);
        }
        let index = WeightedIndex::new(entries.iter().map(|e| e.weight))?;
        Ok(Self { entries, index })
    }

    pub fn entries(&self) -> &[SiblingWeight] {
        &self.entries
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.entries[self.index.sample(rng)].count
    }
}

impl Default for SiblingDistribution {
    fn default() -> Self {
        Self {
            entries: Self::DEFAULT_WEIGHTS.to_vec(),
            index: WeightedIndex::new(Self::DEFAULT_WEIGHTS.iter().map(|e| e.weight))
                .expect("default sibling weights are valid"),
        }
    }
}

/// The choices fixed before a backstory is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackstoryPlan {
    pub gender: Gender,
    pub sibling_count: usize,
}

impl BackstoryPlan {
    /// Draws a gender (even odds) and a sibling count.
    pub fn draw<R: Rng + ?Sized>(siblings: &SiblingDistribution, rng: &mut R) -> Self {
        let gender = if rng.gen_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        };
        Self {
            gender,
            sibling_count: siblings.sample(rng),
        }
    }
}

/// Builds a [`BackstoryResult`] from a raw response.
///
/// Gender and sibling count come from `plan`, not from the text. Exactly
/// `plan.sibling_count` indexed siblings are read; any further sibling
/// tags are ignored.
pub fn assemble_backstory(
    text: &str,
    plan: &BackstoryPlan,
) -> Result<BackstoryResult, ExtractError> {
    let name = require_text(text, vocabulary::NAME)?;
    let location = require_text(text, vocabulary::LOCATION)?;
    let situation = require_text(text, vocabulary::SITUATION)?;

    let mother = ParentRecord {
        name: require_text(text, vocabulary::MOTHER)?,
        age: require_age(text, vocabulary::MOTHER_AGE)?,
        relationship_status: require_status(text, vocabulary::MOTHER_RELATIONSHIP)?,
    };
    let father = ParentRecord {
        name: require_text(text, vocabulary::FATHER)?,
        age: require_age(text, vocabulary::FATHER_AGE)?,
        relationship_status: require_status(text, vocabulary::FATHER_RELATIONSHIP)?,
    };

    let mut siblings = Vec::with_capacity(plan.sibling_count);
    for index in 1..=plan.sibling_count {
        match decode_sibling(text, &SiblingTags::for_index(index)) {
            Ok(sibling) => siblings.push(sibling),
            Err(ExtractError::TagMissing(_)) => {
                return Err(ExtractError::Shape {
                    what: "siblings",
                    expected: plan.sibling_count,
                    found: siblings.len(),
                });
            }
            Err(error) => return Err(error),
        }
    }

    Ok(BackstoryResult {
        name,
        gender: plan.gender,
        location,
        situation,
        mother,
        father,
        siblings,
    })
}

fn decode_sibling(text: &str, tags: &SiblingTags) -> Result<SiblingRecord, ExtractError> {
    Ok(SiblingRecord {
        name: require_text(text, &tags.name)?,
        age: require_age(text, &tags.age)?,
        gender: require_text(text, &tags.gender)?,
        relationship_status: require_status(text, &tags.relationship)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const PARENTS: &str = "<name>Sarah Johnson</name>\n<location>Tacoma, Washington</location>\n\
        <situation>Sarah is born into a middle-class family.</situation>\n\
        <mother>Emily Johnson</mother>\n<motherAge>32</motherAge>\n<motherRelationship>10</motherRelationship>\n\
        <father>Michael Johnson</father>\n<fatherAge>37</fatherAge>\n<fatherRelationship>9</fatherRelationship>";

    fn sibling(i: usize, name: &str) -> String {
        format!(
            "<sibling{i}>{name}</sibling{i}>\n<siblingAge{i}>{age}</siblingAge{i}>\n\
             <siblingGender{i}>Female</siblingGender{i}>\n<siblingRelationship{i}>7</siblingRelationship{i}>\n",
            i = i,
            name = name,
            age = i + 2
        )
    }

    fn plan(count: usize) -> BackstoryPlan {
        BackstoryPlan {
            gender: Gender::Female,
            sibling_count: count,
        }
    }

    #[test]
    fn no_siblings_never_reads_sibling_tags() {
        let result = assemble_backstory(PARENTS, &plan(0)).unwrap();
        assert_eq!(result.name, "Sarah Johnson");
        assert_eq!(result.gender, Gender::Female);
        assert_eq!(result.mother.age, 32);
        assert_eq!(result.father.relationship_status.value(), 9);
        assert!(result.siblings.is_empty());
    }

    #[test]
    fn reads_requested_siblings_in_order() {
        let text = format!(
            "{}\n{}{}{}",
            PARENTS,
            sibling(1, "John"),
            sibling(2, "Emily"),
            sibling(3, "Mary")
        );
        let result = assemble_backstory(&text, &plan(3)).unwrap();
        let names: Vec<&str> = result.siblings.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["John", "Emily", "Mary"]);
        assert_eq!(result.siblings[2].age, 5);
        assert_eq!(result.siblings[0].gender, "Female");
    }

    #[test]
    fn incomplete_siblings_is_shape_error() {
        let text = format!("{}\n{}{}", PARENTS, sibling(1, "John"), sibling(2, "Emily"));
        assert_eq!(
            assemble_backstory(&text, &plan(3)),
            Err(ExtractError::Shape {
                what: "siblings",
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn partially_described_sibling_is_shape_error() {
        let partial = sibling(1, "John").replace("<siblingAge1>3</siblingAge1>", "");
        let text = format!("{}\n{}", PARENTS, partial);
        assert!(matches!(
            assemble_backstory(&text, &plan(1)),
            Err(ExtractError::Shape { found: 0, .. })
        ));
    }

    #[test]
    fn extra_siblings_are_ignored() {
        let text = format!("{}\n{}{}", PARENTS, sibling(1, "John"), sibling(2, "Emily"));
        let result = assemble_backstory(&text, &plan(1)).unwrap();
        assert_eq!(result.siblings.len(), 1);
    }

    #[test]
    fn bad_parent_age_is_decode_error() {
        let text = PARENTS.replace(
            "<motherAge>32</motherAge>",
            "<motherAge>early thirties</motherAge>",
        );
        assert!(matches!(
            assemble_backstory(&text, &plan(0)),
            Err(ExtractError::FieldDecode { ref tag, .. }) if tag == "motherAge"
        ));
    }

    #[test]
    fn missing_parent_is_tag_missing() {
        let text = PARENTS.replace("<father>Michael Johnson</father>", "");
        assert_eq!(
            assemble_backstory(&text, &plan(0)),
            Err(ExtractError::TagMissing("father".to_string()))
        );
    }

    #[test]
    fn default_distribution_only_yields_table_counts() {
        let dist = SiblingDistribution::default();
        let mut rng = StdRng::seed_from_u64(7);
        let allowed = [0, 1, 2, 3, 4, 5, 6, 8, 10];
        for _ in 0..2000 {
            assert!(allowed.contains(&dist.sample(&mut rng)));
        }
    }

    #[test]
    fn default_distribution_favours_two() {
        let dist = SiblingDistribution::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0u32; 11];
        let draws = 20_000;
        for _ in 0..draws {
            counts[dist.sample(&mut rng)] += 1;
        }
        let share = |n: usize| counts[n] as f64 / draws as f64;
        assert!((share(2) - 0.40).abs() < 0.03, "two: {}", share(2));
        assert!((share(0) - 0.10).abs() < 0.02, "zero: {}", share(0));
        let tail = share(5) + share(6) + share(8) + share(10);
        assert!((tail - 0.03).abs() < 0.015, "tail: {}", tail);
        assert_eq!(counts[7] + counts[9], 0);
    }

    #[test]
    fn default_weights_sum_to_whole() {
        let total: u32 = SiblingDistribution::DEFAULT_WEIGHTS.iter().map(|e| e.weight).sum();
        assert_eq!(total, 400);
    }

    #[test]
    fn custom_distribution_validation() {
        assert!(matches!(SiblingDistribution::new(vec![]), Err(DistributionError::Empty)));
        assert!(SiblingDistribution::new(vec![SiblingWeight { count: 1, weight: 0 }]).is_err());
        let single = SiblingDistribution::new(vec![SiblingWeight { count: 4, weight: 1 }]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(single.sample(&mut rng), 4);
    }

    #[test]
    fn plan_draw_is_deterministic_per_seed() {
        let dist = SiblingDistribution::default();
        let a = BackstoryPlan::draw(&dist, &mut StdRng::seed_from_u64(99));
        let b = BackstoryPlan::draw(&dist, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn plan_draw_covers_both_genders() {
        let dist = SiblingDistribution::default();
        let mut rng = StdRng::seed_from_u64(3);
        let genders: Vec<Gender> = (0..64)
            .map(|_| BackstoryPlan::draw(&dist, &mut rng).gender)
            .collect();
        assert!(genders.contains(&Gender::Male));
        assert!(genders.contains(&Gender::Female));
    }
}
