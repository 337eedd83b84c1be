//! Agent personas and the registry that builds them.
//!
//! A [`Persona`] is everything an orchestration framework needs to instantiate an agent:
//! name, system message, model parameters and human-in-the-loop settings. It carries no
//! behaviour of its own; running the conversation is the framework's job.
//!
//! Personas are produced by constructor functions registered by name in a
//! [`PersonaRegistry`]. Lookups are validated: an unknown name or a persona whose model
//! group matches nothing in the [`ModelCatalog`] is reported as a [`PersonaError`] instead of
//! surfacing later as a failed API call.
//!
//! # Example
//!
//! ```rust
//! use agentplay::config::{ModelCatalog, ModelEntry};
//! use agentplay::persona::{PersonaRegistry, GPT3_MODELS, GPT4_MODELS};
//!
//! let catalog = ModelCatalog::new(vec![
//!     ModelEntry::new(GPT3_MODELS[0]).with_api_key("sk-test"),
//!     ModelEntry::new(GPT4_MODELS[0]).with_api_key("sk-test"),
//! ]);
//! let registry = PersonaRegistry::with_builtins();
//!
//! let critic = registry.create("critic", &catalog).unwrap();
//! assert_eq!(critic.name, "critic");
//!
//! let taskmaster = registry
//!     .create_as("advanced_assistant", "taskmaster_agent", &catalog)
//!     .unwrap();
//! assert_eq!(taskmaster.name, "taskmaster_agent");
//!
//! assert!(registry.create("pirate", &catalog).is_err());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{LlmConfig, ModelCatalog};

pub const GPT3_MODELS: &[&str] = &["gpt-3.5-turbo-0125", "gpt-3.5-turbo", "gpt-3.5-turbo-16k-1106"];
pub const GPT4_MODELS: &[&str] = &["gpt-4-0125-preview"];
pub const GPT4_VISION_MODELS: &[&str] = &["gpt-4-vision-preview"];
pub const MISTRAL_MODELS: &[&str] = &["openai/mistral-medium"];
pub const CODELLAMA_MODELS: &[&str] = &["ollama/codellama"];

/// Reply suffix with which the user proxy ends a conversation.
pub const TERMINATE: &str = "TERMINATE";

/// When a persona asks the human for input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HumanInputMode {
    /// Before every reply.
    Always,
    /// Only when a termination message arrives.
    Terminate,
    /// Never; the persona replies automatically.
    Never,
}

/// Where code written by other agents is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExecutionConfig {
    pub work_dir: PathBuf,
    /// Docker image to run in; `None` runs on the host.
    pub docker_image: Option<String>,
}

/// Configuration for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub system_message: String,
    pub llm: LlmConfig,
    pub human_input_mode: HumanInputMode,
    /// Cap on automatic replies before the human is consulted; `None` uses the framework
    /// default.
    pub max_consecutive_auto_reply: Option<u32>,
    /// Whether the persona accepts images.
    pub multimodal: bool,
    pub code_execution: Option<CodeExecutionConfig>,
    /// Messages whose right-trimmed content ends with this suffix end the conversation.
    pub termination_suffix: Option<String>,
}

impl Persona {
    pub fn new(name: impl Into<String>, llm: LlmConfig) -> Self {
        Self {
            name: name.into(),
            system_message: String::new(),
            llm,
            human_input_mode: HumanInputMode::Never,
            max_consecutive_auto_reply: None,
            multimodal: false,
            code_execution: None,
            termination_suffix: None,
        }
    }

    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = system_message.into();
        self
    }

    pub fn with_llm_config(mut self, llm: LlmConfig) -> Self {
        self.llm = llm;
        self
    }

    pub fn with_human_input_mode(mut self, mode: HumanInputMode) -> Self {
        self.human_input_mode = mode;
        self
    }

    pub fn with_max_consecutive_auto_reply(mut self, max: u32) -> Self {
        self.max_consecutive_auto_reply = Some(max);
        self
    }

    pub fn multimodal(mut self) -> Self {
        self.multimodal = true;
        self
    }

    pub fn with_code_execution(mut self, config: CodeExecutionConfig) -> Self {
        self.code_execution = Some(config);
        self
    }

    pub fn with_termination_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.termination_suffix = Some(suffix.into());
        self
    }

    /// Whether `content` ends the conversation for this persona.
    pub fn is_termination_msg(&self, content: &str) -> bool {
        match &self.termination_suffix {
            Some(suffix) => content.trim_end().ends_with(suffix.as_str()),
            None => false,
        }
    }
}

/// Errors raised by [`PersonaRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaError {
    /// No constructor registered under this name.
    Unknown(String),
    /// A constructor is already registered under this name.
    Duplicate(String),
    /// The persona's model group matched nothing in the catalog.
    NoModels(String),
}

impl fmt::Display for PersonaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaError::Unknown(name) => write!(f, "Unknown persona: {}", name),
            PersonaError::Duplicate(name) => write!(f, "Persona already registered: {}", name),
            PersonaError::NoModels(name) => {
                write!(f, "No configured models for persona: {}", name)
            }
        }
    }
}

impl std::error::Error for PersonaError {}

/// Builds a persona from the models available in a catalog.
pub type PersonaConstructor = fn(&ModelCatalog) -> Persona;

/// Name to constructor table.
#[derive(Default)]
pub struct PersonaRegistry {
    constructors: HashMap<String, PersonaConstructor>,
}

impl PersonaRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the stock personas.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for (name, constructor) in BUILTINS {
            registry
                .constructors
                .insert((*name).to_string(), *constructor);
        }
        registry
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: PersonaConstructor,
    ) -> Result<(), PersonaError> {
        let name = name.into();
        if self.constructors.contains_key(&name) {
            return Err(PersonaError::Duplicate(name));
        }
        self.constructors.insert(name, constructor);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted; suitable for a completion menu.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the persona registered as `name`.
    pub fn create(&self, name: &str, catalog: &ModelCatalog) -> Result<Persona, PersonaError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| PersonaError::Unknown(name.to_string()))?;
        let persona = constructor(catalog);
        if persona.llm.config_list.is_empty() {
            return Err(PersonaError::NoModels(name.to_string()));
        }
        debug!(
            "created persona {} with {} model(s)",
            persona.name,
            persona.llm.config_list.len()
        );
        Ok(persona)
    }

    /// Build the persona registered as `name` and rename it, e.g. to run several copies of
    /// the same persona side by side.
    pub fn create_as(
        &self,
        name: &str,
        custom_name: &str,
        catalog: &ModelCatalog,
    ) -> Result<Persona, PersonaError> {
        let mut persona = self.create(name, catalog)?;
        persona.name = custom_name.to_string();
        Ok(persona)
    }
}

const CODER_MESSAGE: &str = "Expert coder responsible for debugging, code optimization, and software design.\n\
    Can interact with other coders in order to improve provided answers.";

const BUILTINS: &[(&str, PersonaConstructor)] = &[
    ("basic_assistant", basic_assistant),
    ("advanced_assistant", advanced_assistant),
    ("nutritionist", nutritionist),
    ("prompt_engineer", prompt_engineer),
    ("master_chef", master_chef),
    ("critic", critic),
    ("qa_automation_engineer", qa_automation_engineer),
    ("openai_coder", openai_coder),
    ("mistral_coder", mistral_coder),
    ("codellama_coder", codellama_coder),
    ("image_analyst", image_analyst),
    ("user_proxy", user_proxy),
];

fn llm(catalog: &ModelCatalog, models: &[&str]) -> LlmConfig {
    LlmConfig::new(catalog.filter(models))
}

fn basic_assistant(catalog: &ModelCatalog) -> Persona {
    Persona::new("basic_assistant", llm(catalog, GPT3_MODELS)).with_system_message(
        "A general-purpose assistant helper.\n\
         You are expected to assist with a wide range of tasks, which may include answering questions, \
         providing explanations, generating ideas, solving problems, and more.\n\
         Your goal is to understand the tasks given to you and provide the most accurate and helpful responses possible.\n\
         You should be able to handle any general task passed to you.",
    )
}

fn advanced_assistant(catalog: &ModelCatalog) -> Persona {
    Persona::new("advanced_assistant", llm(catalog, GPT4_MODELS)).with_system_message(
        "An advanced helper. You are expected to assist with complex tasks, which may include deep analysis, \
         generating sophisticated ideas, solving intricate problems, and more.\n\
         Your goal is to understand the tasks given to you and provide the most accurate, detailed, and insightful responses possible.\n\
         You should be able to handle any advanced task passed to you with a high level of expertise.",
    )
}

fn nutritionist(catalog: &ModelCatalog) -> Persona {
    Persona::new("nutritionist", llm(catalog, GPT3_MODELS)).with_system_message(
        "You are a vegan dietician/nutritionist. Your task is to analyze the macronutrients (proteins, fats, and carbohydrates) \
         of each dish presented to you. Based on your analysis, you will suggest complementary vegan foods that the individual \
         can consume to achieve a balanced intake of vitamins and minerals for the day.\n\
         Additionally, you will provide a total count of all the macronutrients in the dish.",
    )
}

fn prompt_engineer(catalog: &ModelCatalog) -> Persona {
    Persona::new("prompt_engineer", llm(catalog, GPT4_MODELS)).with_system_message(
        "A prompt engineer with detailed knowledge on how various LLMs work. Its roles are:\n\
         Analyzing and interpreting prompts provided by users.\n\
         Refining and optimizing these prompts to ensure that the LLM receives clear, unambiguous instructions, \
         thereby maximizing the quality of the output.\n\
         Generating suggestions on how to 'prime' or prepare the LLM's context before providing a prompt.\n\
         This includes understanding the model's limitations and strengths, and tailoring the context accordingly.\n\
         Providing feedback and suggestions to users on how to craft effective prompts based on the specific LLM in use.",
    )
}

fn master_chef(catalog: &ModelCatalog) -> Persona {
    Persona::new("master_chef", llm(catalog, GPT3_MODELS)).with_system_message(
        "A highly skilled and creative vegan chef with extensive knowledge of plant-based ingredients and cuisines from around the world.\n\
         This chef is adept at creating nutritious, flavorful, and visually appealing vegan dishes, \
         and is always up-to-date with the latest trends and innovations in vegan cooking.",
    )
}

fn critic(catalog: &ModelCatalog) -> Persona {
    Persona::new("critic", llm(catalog, GPT3_MODELS)).with_system_message(
        "Critic AI LLM.\n\
         Reviews and evaluates plans, claims, and code generated by other AI agents, providing constructive feedback and suggestions for improvement.\n\
         Verifies the information included in the plans, ensuring its accuracy and relevance.\n\
         Uses the most recent and relevant information on a given topic to provide contextually accurate and up-to-date feedback.\n\
         Maintains a critical perspective, challenging assumptions and pushing for optimal solutions.",
    )
}

fn qa_automation_engineer(catalog: &ModelCatalog) -> Persona {
    Persona::new("qa_automation_engineer", llm(catalog, GPT3_MODELS)).with_system_message(
        "QA Automation Engineer LLM:\n\
         Develops and maintains automation frameworks for software testing.\n\
         Follows industry best practices for test automation.\n\
         Proficient in various automation tools and languages.\n\
         Capable of designing, writing, executing, and monitoring automated test suites.\n\
         Understands different testing methodologies and their appropriate application.\n\
         Can analyze test results, identify issues, and provide detailed reports.\n\
         Collaborates with development teams to ensure software quality throughout all stages of the software development lifecycle.",
    )
}

fn openai_coder(catalog: &ModelCatalog) -> Persona {
    Persona::new("openai_expert_coder", llm(catalog, GPT4_MODELS)).with_system_message(CODER_MESSAGE)
}

fn mistral_coder(catalog: &ModelCatalog) -> Persona {
    Persona::new("mistral_coder", llm(catalog, MISTRAL_MODELS)).with_system_message(CODER_MESSAGE)
}

fn codellama_coder(catalog: &ModelCatalog) -> Persona {
    Persona::new("codellama_coder", llm(catalog, CODELLAMA_MODELS))
        .with_system_message(CODER_MESSAGE)
}

fn image_analyst(catalog: &ModelCatalog) -> Persona {
    Persona::new(
        "image_analyst",
        llm(catalog, GPT4_VISION_MODELS).with_temperature(0.5),
    )
    .with_system_message("Expert image analyst capable of categorizing all images provided to it.")
    .with_max_consecutive_auto_reply(10)
    .multimodal()
}

fn user_proxy(catalog: &ModelCatalog) -> Persona {
    Persona::new("user_proxy", llm(catalog, GPT3_MODELS))
        .with_system_message(
            "Reply TERMINATE if the task has been solved at full satisfaction.\n\
             Otherwise, reply CONTINUE, or the reason why the task is not solved yet.\n\
             Can also execute code written by the other agents.",
        )
        .with_human_input_mode(HumanInputMode::Always)
        .with_max_consecutive_auto_reply(10)
        .with_code_execution(CodeExecutionConfig {
            work_dir: PathBuf::from("generated_content"),
            docker_image: Some("python:3.10.13".to_string()),
        })
        .with_termination_suffix(TERMINATE)
}
