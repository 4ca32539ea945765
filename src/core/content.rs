//! # Portfolio Content
//!
//! The static data every section renders: profile, skills, certificates,
//! projects and blog posts. Everything here is `&'static` and immutable.
//!
//! [`system_instruction`] turns the same tables into the chat assistant's
//! persona, so the assistant always talks about what the screens show.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate};

pub const PORTFOLIO_OWNER: &str = "Minh Vu";
pub const OWNER_FIRST_NAME: &str = "Minh";

pub struct Profile {
    pub owner: &'static str,
    pub role: &'static str,
    pub specialty: &'static str,
    pub secondary_skills: &'static str,
    pub philosophy: &'static str,
    pub headline: &'static str,
    pub tagline: &'static str,
    pub availability: &'static str,
    pub email: &'static str,
    pub links: &'static [(&'static str, &'static str)],
}

pub const PROFILE: Profile = Profile {
    owner: PORTFOLIO_OWNER,
    role: "Data Scientist & AI Engineer",
    specialty: "Specializing in Deep Learning & MLOps",
    secondary_skills: "Mobile/Web Engineering (used for deploying models)",
    philosophy: "Models are useless until they are deployed and solving real problems.",
    headline: "Bridging Theory & Applied Intelligence",
    tagline: "I am Minh Vu, a Data Scientist who codes. Specializing in scalable Machine Learning and production-grade AI Systems.",
    availability: "Open for opportunities in Machine Learning Engineering, Data Science, and AI Prototyping.",
    email: "hello@minhvu.online",
    links: &[
        ("GitHub", "https://github.com/minhvu"),
        ("LinkedIn", "https://www.linkedin.com/in/minhvu"),
        ("Twitter", "https://twitter.com/minhvu"),
    ],
};

// ============================================================================
// Skills
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillMetric {
    pub subject: &'static str,
    pub level: u8,
    pub full_mark: u8,
}

impl SkillMetric {
    /// Proficiency as a ratio in [0, 1].
    pub fn ratio(&self) -> f64 {
        if self.full_mark == 0 {
            return 0.0;
        }
        (f64::from(self.level) / f64::from(self.full_mark)).clamp(0.0, 1.0)
    }
}

pub const SKILLS: &[SkillMetric] = &[
    SkillMetric { subject: "Data Science & ML", level: 98, full_mark: 100 },
    SkillMetric { subject: "Computer Vision", level: 90, full_mark: 100 },
    SkillMetric { subject: "NLP / LLMs", level: 95, full_mark: 100 },
    SkillMetric { subject: "Mobile Engineering", level: 75, full_mark: 100 },
    SkillMetric { subject: "Cloud Arch (AWS)", level: 85, full_mark: 100 },
];

// ============================================================================
// Certificates
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Certificate {
    pub name: &'static str,
    pub issuer: &'static str,
    pub year: &'static str,
    pub credential_url: Option<&'static str>,
}

pub const CERTIFICATES: &[Certificate] = &[
    Certificate {
        name: "AWS Certified Machine Learning - Specialty",
        issuer: "Amazon Web Services",
        year: "2024",
        credential_url: None,
    },
    Certificate {
        name: "Professional Data Engineer",
        issuer: "Google Cloud",
        year: "2023",
        credential_url: None,
    },
    Certificate {
        name: "Deep Learning Specialization",
        issuer: "DeepLearning.AI",
        year: "2023",
        credential_url: None,
    },
    Certificate {
        name: "TensorFlow Developer Certificate",
        issuer: "Google",
        year: "2022",
        credential_url: None,
    },
];

// ============================================================================
// Projects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechStack {
    Python,
    PyTorch,
    TensorFlow,
    Aws,
    React,
    Flutter,
    Docker,
    Gemini,
    Sql,
    Swift,
    ArKit,
    Firebase,
}

impl fmt::Display for TechStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TechStack::Python => "Python",
            TechStack::PyTorch => "PyTorch",
            TechStack::TensorFlow => "TensorFlow",
            TechStack::Aws => "AWS",
            TechStack::React => "React",
            TechStack::Flutter => "Flutter",
            TechStack::Docker => "Docker",
            TechStack::Gemini => "Gemini API",
            TechStack::Sql => "SQL",
            TechStack::Swift => "Swift",
            TechStack::ArKit => "ARKit",
            TechStack::Firebase => "Firebase",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectCategory {
    DataScience,
    MobileEngineering,
    Hybrid,
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectCategory::DataScience => f.write_str("Data Science"),
            ProjectCategory::MobileEngineering => f.write_str("Mobile Engineering"),
            ProjectCategory::Hybrid => f.write_str("Hybrid"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    pub long_description: &'static str,
    pub tech: &'static [TechStack],
    pub category: ProjectCategory,
    pub demo_url: Option<&'static str>,
    pub repo_url: Option<&'static str>,
}

impl Project {
    /// The chat prompt sent when a visitor asks about this project.
    pub fn ask_prompt(&self) -> String {
        format!(
            "Can you explain the technical details of the \"{}\" project? What challenges did you face?",
            self.title
        )
    }

    pub fn tech_list(&self) -> String {
        self.tech
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub const PROJECTS: &[Project] = &[
    Project {
        title: "SentientTrader: RL FinTech Agent",
        description: "Reinforcement Learning agent for high-frequency crypto trading.",
        long_description: "A custom PPO (Proximal Policy Optimization) agent trained on 5 years of tick data. It utilizes a Transformer-based feature extractor to identify market regime shifts. The system is deployed on AWS SageMaker with a React dashboard for monitoring real-time PnL and risk metrics.",
        tech: &[TechStack::Python, TechStack::PyTorch, TechStack::Aws, TechStack::React],
        category: ProjectCategory::DataScience,
        demo_url: None,
        repo_url: Some("https://github.com/minhvu/sentient-trader"),
    },
    Project {
        title: "VisionGuard: Edge Threat Detection",
        description: "Real-time anomaly detection for security cameras using Edge AI.",
        long_description: "Developed a lightweight YOLOv8 model optimized for NVIDIA Jetson Nano. The system processes video feeds locally to detect unauthorized personnel and safety violations, sending encrypted alerts via a companion mobile app (Flutter). Privacy-preserving by design.",
        tech: &[TechStack::Python, TechStack::TensorFlow, TechStack::Flutter, TechStack::Docker],
        category: ProjectCategory::Hybrid,
        demo_url: Some("https://visionguard.minhvu.online"),
        repo_url: None,
    },
    Project {
        title: "MediLLM: Clinical RAG Assistant",
        description: "Retrieval-Augmented Generation system for summarizing patient records.",
        long_description: "Fine-tuned Llama-3 8B on medical literature to assist doctors in summarizing complex patient histories. Built a scalable vector search pipeline using Pinecone and LangChain. Includes a web interface for doctors to query patient data securely.",
        tech: &[TechStack::Python, TechStack::Gemini, TechStack::React, TechStack::Sql],
        category: ProjectCategory::DataScience,
        demo_url: None,
        repo_url: Some("https://github.com/minhvu/medillm"),
    },
    Project {
        title: "EcoScan: AR Waste Classifier",
        description: "Mobile app using computer vision to classify recyclables.",
        long_description: "A fun side project utilizing my mobile exp. Users point their camera at waste, and the CoreML model classifies it as Recyclable, Compost, or Trash. Gamified with leaderboards to encourage sustainable habits.",
        tech: &[TechStack::Swift, TechStack::ArKit, TechStack::TensorFlow, TechStack::Firebase],
        category: ProjectCategory::MobileEngineering,
        demo_url: None,
        repo_url: None,
    },
];

// ============================================================================
// Blog
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlogPost {
    pub title: &'static str,
    pub summary: &'static str,
    /// Markdown body.
    pub content: &'static str,
    /// Display date, e.g. `Mar 15, 2024`.
    pub date: &'static str,
    pub read_time: &'static str,
    pub tags: &'static [&'static str],
}

impl BlogPost {
    pub fn published(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date, "%b %d, %Y").ok()
    }

    /// The one-shot prompt asking for a TL;DR of this post.
    pub fn summary_prompt(&self) -> String {
        format!(
            "Summarize the following technical article in 3 concise bullet points. Focus on the problem, solution, and results:\n\nTitle: {}\n\nContent:\n{}",
            self.title, self.content
        )
    }
}

pub const BLOGS: &[BlogPost] = &[
    BlogPost {
        title: "The Death of \"Model.fit()\": Why MLOps Matters",
        summary: "Training a model is the easy part. Here is how I built a robust CI/CD pipeline for retraining crypto bots automatically.",
        content: "# Beyond the Notebook

As Data Scientists, we love Jupyter Notebooks. But you can't deploy a notebook.

## The Challenge
My trading bot, SentientTrader, needed to adapt to new market conditions weekly. Manually retraining was error-prone.

## The Solution
I built a pipeline using:
1. **Airflow** for orchestration.
2. **MLflow** for experiment tracking.
3. **AWS Lambda** for triggering deployment.

This automated pipeline reduced model degradation by 40%.",
        date: "Mar 15, 2024",
        read_time: "5 min read",
        tags: &["MLOps", "Engineering", "Python"],
    },
    BlogPost {
        title: "Fine-tuning Llama-3 vs Prompt Engineering",
        summary: "When does it make sense to burn GPU credits? A case study on medical summarization.",
        content: "# To Train or To Prompt?

With Gemini 1.5 Pro's massive context window, do we still need RAG? Do we still need fine-tuning?

## The Experiment
I compared zero-shot prompting on Gemini against a fine-tuned Llama-3 8B for extracting symptoms from clinical notes.

## Results
Fine-tuning won on consistent formatting, but Gemini won on reasoning capabilities. The hybrid approach is the future.",
        date: "Feb 20, 2024",
        read_time: "8 min read",
        tags: &["LLMs", "Generative AI", "Research"],
    },
    BlogPost {
        title: "Flutter for Data Scientists?",
        summary: "Why I learned mobile development to showcase my AI models better.",
        content: "Most DS portfolios are Streamlit apps. I wanted something more tangible. Learning Flutter allowed me to put my Computer Vision models into people's hands...",
        date: "Jan 10, 2024",
        read_time: "6 min read",
        tags: &["Mobile", "Flutter", "Career"],
    },
];

// ============================================================================
// Chat copy
// ============================================================================

/// Quick-reply chips offered at the start of a conversation.
pub const SUGGESTIONS: &[&str] = &[
    "Summarize Minh's experience",
    "What is the best ML project?",
    "Does Minh know React?",
    "How to contact?",
];

pub const RECRUITER_GREETING: &str = "Hello! I'm ready to analyze a Job Description. Please paste the JD below, and I'll evaluate how well my skills match the role!";

pub fn chat_greeting() -> String {
    format!(
        "Hi! I'm {OWNER_FIRST_NAME}'s AI Assistant. I can analyze my projects or answer questions about my background."
    )
}

/// Footer line with the current calendar year.
pub fn footer() -> String {
    footer_for_year(Local::now().year())
}

fn footer_for_year(year: i32) -> String {
    format!("© {year} {PORTFOLIO_OWNER}. {}.", PROFILE.role)
}

/// Renders the chat assistant's system instruction from the portfolio data.
pub fn system_instruction() -> String {
    let skills = SKILLS
        .iter()
        .map(|s| s.subject)
        .collect::<Vec<_>>()
        .join(", ");
    let projects = PROJECTS
        .iter()
        .map(|p| {
            format!(
                "- {} ({}): {} Tech: {}",
                p.title,
                p.category,
                p.description,
                p.tech_list()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let owner = PORTFOLIO_OWNER;

    format!(
        "You are an AI Assistant living in the portfolio website of {owner}.
Your goal is to professionally and enthusiastically represent {owner} to potential employers or collaborators.

Profile:
- Role: {role} ({specialty}).
- Secondary Skills: {secondary}.
- Key Skills: {skills}.
- Philosophy: \"{philosophy}\"

Projects Context:
{projects}

**Special Instructions for Job Descriptions:**
If the user provides a Job Description (JD) or asks for a fit analysis:
1. Analyze the JD against {owner}'s skills and projects.
2. Provide a \"Match Score\" (0-100%).
3. List 3 key strengths (\"Why it's a match\").
4. List 1 potential gap or area for discussion.
5. Use concise Markdown formatting with bold text for emphasis.
6. Be honest but persuasive.
",
        role = PROFILE.role,
        specialty = PROFILE.specialty,
        secondary = PROFILE.secondary_skills,
        philosophy = PROFILE.philosophy,
    )
}
