/// Prompt construction: fills templates that ask for the tag vocabulary.

use crate::core::backstory::BackstoryPlan;
use crate::core::vocabulary::{self, SiblingTags};
use crate::schema::character::{CharacterState, LifeStage};
use crate::schema::relationship::Relationship;
use crate::schema::scenario::{Choice, CHOICE_COUNT};
use crate::schema::stats::Stat;

/// Builds the prompt text for each kind of request.
///
/// Whatever the wording, a prompt must ask for the tags its assembler reads.
pub trait PromptBuilder: Send + Sync {
    fn scenario(&self, character: &CharacterState, relationships: &[Relationship]) -> String;

    fn evaluation(
        &self,
        choice: &Choice,
        scenario_text: &str,
        character: &CharacterState,
        relationships: &[Relationship],
    ) -> String;

    fn backstory(&self, plan: &BackstoryPlan) -> String;
}

/// The stock English prompts.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPrompts;

const DELTA_GUIDE: &str = "\
- 1 means a significant decrease
- 2 means a moderate decrease
- 3 means no change
- 4 means a moderate increase
- 5 means a significant increase";

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn tag_line(out: &mut String, tag: &str, hint: &str) {
    line(out, &format!("<{tag}>{hint}</{tag}>", tag = tag, hint = hint));
}

fn character_sheet(out: &mut String, character: &CharacterState) {
    line(out, &format!("Name: {}", character.name));
    line(out, &format!("Age: {}", character.age));
    for stat in Stat::ALL {
        let value = character.stats.get(stat);
        line(out, &format!("{}: {} / 100", stat.key(), value));
    }
    line(out, &format!("Net Worth: {}", character.net_worth));

    if !character.history.is_empty() {
        line(out, "\nTheir life so far:");
        for entry in &character.history {
            line(out, &format!("- {}", entry));
        }
    }
    if !character.life_events.is_empty() {
        line(out, "\nTheir notable life events:");
        for event in &character.life_events {
            line(out, &format!("- {}", event));
        }
    }
}

fn relationship_list(out: &mut String, relationships: &[Relationship]) {
    line(
        out,
        "\nTheir current relationships (status from 1, hatred, to 10, pure love):",
    );
    if relationships.is_empty() {
        line(out, "(none)");
    }
    for rel in relationships {
        line(
            out,
            &format!(
                "- {}: {} - Relationship status: {}",
                rel.relationship_type, rel.name, rel.relationship_status
            ),
        );
    }
}

fn stage_context(character: &CharacterState) -> String {
    let (name, age) = (&character.name, character.age);
    match character.life_stage() {
        LifeStage::EarlyChildhood => format!(
            "{} is {} years old, in early childhood. Present a choice that fits this stage, such as between toys or first words.",
            name, age
        ),
        LifeStage::Preschool => format!(
            "{} is {} years old, in the preschool years. Present a decision that covers ages 3 to 5.",
            name, age
        ),
        LifeStage::Elementary => format!(
            "{} is {} years old, in the elementary school years. Present a decision that covers ages 6 to 12.",
            name, age
        ),
        LifeStage::Older => format!("{} is {} years old.", name, age),
    }
}

impl PromptBuilder for DefaultPrompts {
    fn scenario(&self, character: &CharacterState, relationships: &[Relationship]) -> String {
        let mut out = String::from(
            "Generate an age-appropriate scenario and three choices for a life simulation game.\n\n",
        );
        character_sheet(&mut out, character);
        relationship_list(&mut out, relationships);
        line(&mut out, &format!("\n{}", stage_context(character)));
        out.push_str("Always refer to the character as \"you\" in the scenario.\n\n");

        out.push_str(
            "For each choice, give its effect on every stat as a JSON object whose keys are \
             Health, Intelligence, Charisma, Happiness, Fitness and Creativity, each a whole number from 1 to 5:\n",
        );
        out.push_str(DELTA_GUIDE);
        out.push_str(
            "\nMatch the gravity of each choice to the character's age and circumstances.\n\n\
             Respond using exactly these tags:\n",
        );
        tag_line(&mut out, vocabulary::SCENARIO, "Description of the scenario");
        for i in 1..=CHOICE_COUNT {
            tag_line(&mut out, &vocabulary::choice(i), &format!("Choice {}", i));
            tag_line(
                &mut out,
                &vocabulary::choice_stats(i),
                &format!("JSON object with the stat changes for choice {}", i),
            );
        }
        out.push_str(
            "\nFor example:\n<choice1Stats>{\"Health\": 3, \"Intelligence\": 3, \"Charisma\": 3, \
             \"Happiness\": 1, \"Fitness\": 4, \"Creativity\": 3}</choice1Stats>\n",
        );
        out
    }

    fn evaluation(
        &self,
        choice: &Choice,
        scenario_text: &str,
        character: &CharacterState,
        relationships: &[Relationship],
    ) -> String {
        let mut out = String::from(
            "You are evaluating a choice made by a character in a life simulation game.\n\n",
        );
        character_sheet(&mut out, character);
        relationship_list(&mut out, relationships);
        line(&mut out, &format!("\nThe scenario:\n{}", scenario_text));
        line(&mut out, &format!("\nThe choice made:\n{}", choice.choice_text));
        line(&mut out, "\nIts effect on each stat (1 to 5):");
        for stat in Stat::ALL {
            line(&mut out, &format!("{}: {}", stat.key(), choice.delta.get(stat)));
        }
        out.push_str(DELTA_GUIDE);
        out.push_str(
            "\n\nWrite a very concise summary of the scenario and choice, referring to the character by name, \
             then a short outcome referring to the character as \"you\". Decide whether this was a notable \
             life event. Add a relationship only for someone the character will now interact with regularly, \
             and remove one only if they no longer will, using the name exactly as listed above.\n\n\
             Respond using these tags:\n",
        );
        tag_line(&mut out, vocabulary::SUMMARY, "Summary of the scenario and choice");
        tag_line(&mut out, vocabulary::OUTCOME, "Outcome of the choice");
        tag_line(&mut out, vocabulary::NOTABLE_LIFE_EVENT, "true or false");
        tag_line(
            &mut out,
            vocabulary::LIFE_EVENT_SUMMARY,
            "Summary of the life event (only if notableLifeEvent is true)",
        );
        let new_relationships = format!(
            "<{container}>\n<{block}>\n  <{name}>Name</{name}>\n  <{age}>Age in years</{age}>\n  \
             <{gender}>male or female</{gender}>\n  <{kind}>friend, coworker, ...</{kind}>\n  \
             <{status}>1 to 10</{status}>\n</{block}>\n</{container}> (optional, may repeat <{block}>)",
            container = vocabulary::NEW_RELATIONSHIPS,
            block = vocabulary::RELATIONSHIP,
            name = vocabulary::NAME,
            age = vocabulary::AGE,
            gender = vocabulary::GENDER,
            kind = vocabulary::RELATIONSHIP_TYPE,
            status = vocabulary::RELATIONSHIP_STATUS,
        );
        line(&mut out, &new_relationships);
        let removed_relationships = format!(
            "<{container}>\n<{block}>\n  <{name}>Name</{name}>\n  <{reason}>Reason</{reason}>\n\
             </{block}>\n</{container}> (optional, may repeat <{block}>)",
            container = vocabulary::REMOVED_RELATIONSHIPS,
            block = vocabulary::REMOVED_RELATIONSHIP,
            name = vocabulary::NAME,
            reason = vocabulary::REASON,
        );
        line(&mut out, &removed_relationships);
        out
    }

    fn backstory(&self, plan: &BackstoryPlan) -> String {
        let gender = plan.gender;
        let mut out = format!(
            "Generate a random backstory for a newborn character in a life simulation game. \
             The character is {}. Give their name, place of birth, the family situation they are born into \
             (in the present tense, without describing their state of mind), and their parents",
            gender
        );
        match plan.sibling_count {
            0 => out.push_str(". They have no siblings.\n\n"),
            1 => out.push_str(" and their 1 older sibling.\n\n"),
            n => out.push_str(&format!(" and their {} older siblings.\n\n", n)),
        }

        out.push_str("Respond using exactly these tags:\n");
        tag_line(&mut out, vocabulary::NAME, &format!("Character's full name (a {})", gender));
        tag_line(&mut out, vocabulary::LOCATION, "Place of birth");
        tag_line(&mut out, vocabulary::SITUATION, "Family and life circumstances at birth");
        tag_line(&mut out, vocabulary::MOTHER, "Name of the mother");
        tag_line(&mut out, vocabulary::MOTHER_AGE, "Age of the mother");
        tag_line(&mut out, vocabulary::MOTHER_RELATIONSHIP, "Relationship with mother, 1 to 10");
        tag_line(&mut out, vocabulary::FATHER, "Name of the father");
        tag_line(&mut out, vocabulary::FATHER_AGE, "Age of the father");
        tag_line(&mut out, vocabulary::FATHER_RELATIONSHIP, "Relationship with father, 1 to 10");
        for i in 1..=plan.sibling_count {
            let tags = SiblingTags::for_index(i);
            tag_line(&mut out, &tags.name, "Name of sibling");
            tag_line(&mut out, &tags.age, "Age of sibling");
            tag_line(&mut out, &tags.gender, "male or female");
            tag_line(&mut out, &tags.relationship, "Relationship with sibling, 1 to 10");
        }
        out
    }
}
