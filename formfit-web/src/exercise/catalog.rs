//! Exercise catalog - built-in database plus JSON-loaded definitions

use tracing::warn;

use super::definition::{Category, Difficulty, Exercise, FormRule, Phase};
use crate::error::CatalogError;
use crate::pose::AngleName::{self, *};

/// Read-only list of validated exercises
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    exercises: Vec<Exercise>,
    rejected: Vec<CatalogError>,
}

impl Catalog {
    /// Validate and collect definitions
    ///
    /// Structurally broken or duplicate entries are dropped and recorded.
    /// A bad phase order only disables rep counting, so the entry is kept.
    pub fn load(definitions: Vec<Exercise>) -> Self {
        let mut catalog = Catalog::default();
        for exercise in definitions {
            if catalog.find(&exercise.id).is_some() {
                warn!(id = %exercise.id, "duplicate exercise id, keeping the first");
                catalog.rejected.push(CatalogError::DuplicateId(exercise.id));
                continue;
            }
            if let Err(err) = exercise.validate() {
                warn!(%err, "rejecting exercise definition");
                catalog.rejected.push(err);
                continue;
            }
            // An empty order is a deliberate hold, not a mistake
            if !exercise.phase_order.is_empty() {
                if let Err(err) = exercise.rep_cycle() {
                    warn!(%err, "rep counting disabled");
                    catalog.rejected.push(err);
                }
            }
            catalog.exercises.push(exercise);
        }
        catalog
    }

    /// Parse a JSON array of exercise definitions
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let definitions: Vec<Exercise> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Ok(Self::load(definitions))
    }

    pub fn builtin() -> Self {
        Self::load(builtin_exercises())
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    /// Problems found while loading
    pub fn rejected(&self) -> &[CatalogError] {
        &self.rejected
    }

    pub fn find(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Exercises in a category; "All" returns everything
    pub fn by_category(&self, category: &str) -> Vec<&Exercise> {
        self.exercises
            .iter()
            .filter(|e| category == "All" || e.category.as_str() == category)
            .collect()
    }

    /// Match free-form speech ("let's do some squats") to an exercise
    pub fn match_spoken(&self, text: &str) -> Option<&Exercise> {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }
        self.exercises.iter().find(|e| {
            text.contains(&e.name.to_lowercase())
                || e.aliases.iter().any(|a| text.contains(&a.to_lowercase()))
        })
    }
}

fn both(left: AngleName, right: AngleName, min: f32, max: f32) -> [(AngleName, f32, f32); 2] {
    [(left, min, max), (right, min, max)]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_exercises() -> Vec<Exercise> {
    vec![
        Exercise {
            id: "shoulder_press".into(),
            name: "Shoulder Press".into(),
            category: Category::Shoulders,
            difficulty: Difficulty::Beginner,
            muscles: strings(&["Deltoids", "Triceps"]),
            description: "Press weights overhead to build shoulders".into(),
            tips: strings(&[
                "Feet shoulder-width apart",
                "Weights at shoulder height",
                "Press straight up",
                "Lower with control",
            ]),
            aliases: strings(&["shoulder presses", "overhead press", "military press"]),
            phases: vec![
                Phase::new("DOWN", &both(LeftElbow, RightElbow, 70.0, 120.0)),
                Phase::new("UP", &both(LeftElbow, RightElbow, 150.0, 180.0)),
            ],
            phase_order: strings(&["DOWN", "UP"]),
            movement_threshold: 20.0,
            rule: FormRule::ShoulderPress,
        },
        Exercise {
            id: "squat".into(),
            name: "Squat".into(),
            category: Category::Legs,
            difficulty: Difficulty::Intermediate,
            muscles: strings(&["Quads", "Glutes"]),
            description: "King of leg exercises for lower body strength".into(),
            tips: strings(&[
                "Feet shoulder-width apart",
                "Keep chest up",
                "Thighs parallel to ground",
                "Drive through heels",
            ]),
            aliases: strings(&["squats", "bodyweight squat", "air squat"]),
            phases: vec![
                Phase::new("STANDING", &both(LeftKnee, RightKnee, 160.0, 180.0)),
                Phase::new("BOTTOM", &both(LeftKnee, RightKnee, 70.0, 110.0)),
            ],
            phase_order: strings(&["STANDING", "BOTTOM"]),
            movement_threshold: 20.0,
            rule: FormRule::Squat,
        },
        Exercise {
            id: "push_up".into(),
            name: "Push Up".into(),
            category: Category::Chest,
            difficulty: Difficulty::Beginner,
            muscles: strings(&["Chest", "Triceps"]),
            description: "Classic upper body pushing exercise".into(),
            tips: strings(&[
                "Hands wider than shoulders",
                "Body in straight line",
                "Chest to ground",
                "Push up fully",
            ]),
            aliases: strings(&["push ups", "pushup", "pushups", "push-up"]),
            phases: vec![
                Phase::new("UP", &both(LeftElbow, RightElbow, 160.0, 180.0)),
                Phase::new("DOWN", &both(LeftElbow, RightElbow, 70.0, 110.0)),
            ],
            phase_order: strings(&["UP", "DOWN"]),
            movement_threshold: 20.0,
            rule: FormRule::PushUp,
        },
        Exercise {
            id: "lunge".into(),
            name: "Lunge".into(),
            category: Category::Legs,
            difficulty: Difficulty::Beginner,
            muscles: strings(&["Quads", "Glutes"]),
            description: "Build unilateral leg strength".into(),
            tips: strings(&[
                "Step forward",
                "Both knees at 90°",
                "Front knee over ankle",
                "Push back up",
            ]),
            aliases: strings(&["lunges", "forward lunge"]),
            phases: vec![
                Phase::new("STANDING", &both(LeftKnee, RightKnee, 150.0, 180.0)),
                Phase::new("DOWN", &both(LeftKnee, RightKnee, 80.0, 120.0)),
            ],
            phase_order: strings(&["STANDING", "DOWN"]),
            movement_threshold: 20.0,
            rule: FormRule::Lunge,
        },
        Exercise {
            id: "lateral_raise".into(),
            name: "Lateral Raise".into(),
            category: Category::Shoulders,
            difficulty: Difficulty::Beginner,
            muscles: strings(&["Side Delts"]),
            description: "Isolate side delts for wider shoulders".into(),
            tips: strings(&[
                "Dumbbells at sides",
                "Slight elbow bend",
                "Raise to shoulder height",
                "Lower with control",
            ]),
            aliases: strings(&["lateral raises", "side raise", "side raises"]),
            phases: vec![
                Phase::new("DOWN", &both(LeftArmRaise, RightArmRaise, 0.0, 40.0)),
                Phase::new("UP", &both(LeftArmRaise, RightArmRaise, 70.0, 110.0)),
            ],
            phase_order: strings(&["DOWN", "UP"]),
            movement_threshold: 15.0,
            rule: FormRule::LateralRaise,
        },
        Exercise {
            id: "bicep_curl".into(),
            name: "Bicep Curl".into(),
            category: Category::Arms,
            difficulty: Difficulty::Beginner,
            muscles: strings(&["Biceps"]),
            description: "Curl weights to build arm strength".into(),
            tips: strings(&[
                "Stand with arms at sides",
                "Keep elbows close to body",
                "Curl weights to shoulders",
                "Lower slowly with control",
            ]),
            aliases: strings(&["bicep curls", "curls", "arm curls"]),
            phases: vec![
                Phase::new("DOWN", &both(LeftElbow, RightElbow, 150.0, 180.0)),
                Phase::new("UP", &both(LeftElbow, RightElbow, 30.0, 60.0)),
            ],
            phase_order: strings(&["DOWN", "UP"]),
            movement_threshold: 20.0,
            rule: FormRule::BicepCurl,
        },
        Exercise {
            id: "plank".into(),
            name: "Plank".into(),
            category: Category::Core,
            difficulty: Difficulty::Beginner,
            muscles: strings(&["Core", "Shoulders"]),
            description: "Hold a straight body line to build core stability".into(),
            tips: strings(&[
                "Forearms on ground, elbows under shoulders",
                "Keep body in straight line",
                "Engage core, don't let hips sag",
                "Hold position",
            ]),
            aliases: strings(&["planks", "forearm plank"]),
            phases: vec![Phase::new(
                "HOLD",
                &[
                    (BodyLine, 160.0, 180.0),
                    (LeftHip, 160.0, 180.0),
                    (RightHip, 160.0, 180.0),
                ],
            )],
            phase_order: Vec::new(),
            movement_threshold: 10.0,
            rule: FormRule::Plank,
        },
    ]
}
