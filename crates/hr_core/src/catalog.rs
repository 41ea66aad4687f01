//! Catalogs the generator samples from, and the named presets bundling them
//! with title/summary templates.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const CAREERS: &str = "careers";
pub const HR_TRENDS: &str = "hr-trends";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub sources: Vec<String>,
    pub categories: Vec<String>,
    pub topics: Vec<String>,
}

impl Catalog {
    pub fn validate(&self) -> Result<()> {
        for (field, values) in [
            ("sources", &self.sources),
            ("categories", &self.categories),
            ("topics", &self.topics),
        ] {
            if values.is_empty() {
                return Err(Error::invalid_input(format!("catalog `{}` must not be empty", field)));
            }
        }
        Ok(())
    }
}

/// Title and summary templates. `{topic}`, `{topic_lower}` and `{year}` are substituted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Templates {
    pub title: String,
    pub summary: String,
}

impl Templates {
    pub fn render_title(&self, topic: &str, year: i32) -> String {
        render(&self.title, topic, year)
    }

    pub fn render_summary(&self, topic: &str, year: i32) -> String {
        render(&self.summary, topic, year)
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.summary.trim().is_empty() {
            return Err(Error::invalid_input("title and summary templates must not be empty"));
        }
        Ok(())
    }
}

fn render(template: &str, topic: &str, year: i32) -> String {
    template
        .replace("{topic_lower}", &topic.to_lowercase())
        .replace("{topic}", topic)
        .replace("{year}", &year.to_string())
}

/// How `top_category` and `top_source` are filled in the batch summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TopLabels {
    /// Constant labels, independent of the batch contents.
    Fixed { category: String, source: String },
    /// The category and source with the most summed views in the batch.
    MostViewed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub catalog: Catalog,
    pub templates: Templates,
    pub top_labels: TopLabels,
}

impl Preset {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_input("preset name must not be empty"));
        }
        self.catalog.validate()?;
        self.templates.validate()
    }

    /// Reads a preset from a JSON file and validates it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let preset: Preset = serde_json::from_str(&raw)?;
        preset.validate()?;
        Ok(preset)
    }

    /// Job-search flavoured variant served by the deployed `/api`.
    pub fn careers() -> Self {
        Self {
            name: CAREERS.to_string(),
            catalog: Catalog {
                sources: strings(&[
                    "Portal Carreira", "InfoJobs", "Vagas.com", "LinkedIn", "Glassdoor",
                    "Catho", "Indeed", "Brasil Vagas", "Empregos.com", "Carreira & Sucesso",
                ]),
                categories: strings(&[
                    "Entrevistas", "Currículo", "Busca de Emprego", "Processos Seletivos",
                    "Dicas de Carreira", "Recrutamento", "Networking", "Preparação",
                    "Mercado de Trabalho", "Oportunidades",
                ]),
                topics: strings(&[
                    "Como passar em entrevistas de emprego",
                    "Dicas para criar um currículo perfeito",
                    "Estratégias de busca de emprego",
                    "Como se destacar em processos seletivos",
                    "Networking para conseguir emprego",
                    "Preparação para entrevistas",
                    "Mercado de trabalho 2024",
                    "Oportunidades de carreira",
                    "Como negociar salário",
                    "Transição de carreira",
                ]),
            },
            templates: Templates {
                title: "{topic}: Guia completo para {year}".to_string(),
                summary: "Artigo completo sobre {topic_lower} com dicas práticas e estratégias para {year}."
                    .to_string(),
            },
            top_labels: TopLabels::Fixed {
                category: "Entrevistas".to_string(),
                source: "Portal Carreira".to_string(),
            },
        }
    }

    /// HR trade-press variant served by the local development server.
    pub fn hr_trends() -> Self {
        Self {
            name: HR_TRENDS.to_string(),
            catalog: Catalog {
                sources: strings(&[
                    "Portal RH Brasil", "Revista RH", "HR Brasil", "Gestão RH", "RH Digital",
                    "Portal Carreira", "RH Online", "Gestão de Pessoas", "RH News", "HR Trends",
                ]),
                categories: strings(&[
                    "Legislação", "Tecnologia", "Trabalho Remoto", "Benefícios", "Diversidade",
                    "Gerações", "Bem-estar", "Treinamento", "Retenção", "Remuneração",
                ]),
                topics: strings(&[
                    "Nova legislação trabalhista 2024",
                    "IA e automação em RH",
                    "Home office híbrido",
                    "Benefícios flexíveis",
                    "Diversidade e inclusão",
                    "Geração Z no trabalho",
                    "Bem-estar corporativo",
                    "E-learning corporativo",
                    "Retenção de talentos",
                    "Salários e remuneração",
                ]),
            },
            templates: Templates {
                title: "{topic}: Tendências que dominarão {year}".to_string(),
                summary: "Artigo atualizado sobre {topic_lower} com insights valiosos para profissionais de RH em {year}."
                    .to_string(),
            },
            top_labels: TopLabels::Fixed {
                category: "Tecnologia".to_string(),
                source: "Portal RH Brasil".to_string(),
            },
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Presets addressable by name, with one of them marked as the default.
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    presets: Vec<Preset>,
    default: String,
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self {
            presets: vec![Preset::careers(), Preset::hr_trends()],
            default: CAREERS.to_string(),
        }
    }
}

impl PresetRegistry {
    /// Adds a preset, replacing any existing preset with the same name.
    pub fn with_preset(mut self, preset: Preset) -> Result<Self> {
        preset.validate()?;
        match self.presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
        Ok(self)
    }

    pub fn with_default(mut self, name: &str) -> Result<Self> {
        self.get(name)?;
        self.default = name.to_string();
        Ok(self)
    }

    /// Switches every preset to computing its top labels from the batch.
    pub fn with_most_viewed_labels(mut self) -> Self {
        for preset in &mut self.presets {
            preset.top_labels = TopLabels::MostViewed;
        }
        self
    }

    pub fn get(&self, name: &str) -> Result<&Preset> {
        self.presets
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "unknown preset `{}` (available: {})",
                    name,
                    self.names().join(", ")
                ))
            })
    }

    pub fn default_preset(&self) -> &Preset {
        // `default` is only ever set to a name that resolved.
        self.presets
            .iter()
            .find(|p| p.name == self.default)
            .unwrap_or(&self.presets[0])
    }

    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.name.as_str()).collect()
    }
}
