//! Demo tenants for local development.
//!
//! When `seed_demo_data` is enabled, startup inserts two companies with a recruiter, a few
//! ordered careers page sections and some open jobs. A tenant whose slug already exists is left
//! alone, so seeding is safe to run on every start.

use sqlx::PgPool;
use tracing::{info, instrument};

use crate::{
    api::models::{jobs::JobType, sections::SectionType},
    auth::password::{self, Argon2Params},
    config::Config,
    db::{
        handlers::{Companies, Jobs, Recruiters, Repository, Sections},
        models::{
            companies::CompanyCreateDBRequest, jobs::JobCreateDBRequest, recruiters::RecruiterCreateDBRequest,
            sections::SectionCreateDBRequest,
        },
    },
    errors::Error,
};

struct DemoSection {
    section_type: SectionType,
    title: &'static str,
    content: &'static str,
}

struct DemoJob {
    title: &'static str,
    description: &'static str,
    location: &'static str,
    job_type: JobType,
    department: &'static str,
    salary_range: &'static str,
    requirements: &'static str,
}

struct DemoTenant {
    name: &'static str,
    slug: &'static str,
    primary_color: &'static str,
    secondary_color: &'static str,
    recruiter_email: &'static str,
    recruiter_name: &'static str,
    sections: &'static [DemoSection],
    jobs: &'static [DemoJob],
}

/// Password of every demo recruiter.
pub const DEMO_PASSWORD: &str = "password123";

const TENANTS: &[DemoTenant] = &[
    DemoTenant {
        name: "TechCorp Solutions",
        slug: "techcorp",
        primary_color: "#2563EB",
        secondary_color: "#1E40AF",
        recruiter_email: "recruiter@techcorp.com",
        recruiter_name: "John Smith",
        sections: &[
            DemoSection {
                section_type: SectionType::About,
                title: "About TechCorp",
                content: "TechCorp Solutions is a leading technology company specializing in innovative software solutions for enterprise clients worldwide.\n\nFounded in 2010, we have grown from a small startup to a global leader with over 500 employees across 10 countries.",
            },
            DemoSection {
                section_type: SectionType::Values,
                title: "Our Values",
                content: "Innovation - We constantly push boundaries and embrace new ideas.\n\nIntegrity - We act with honesty and transparency in everything we do.\n\nCollaboration - We believe the best results come from working together.",
            },
            DemoSection {
                section_type: SectionType::Benefits,
                title: "Benefits & Perks",
                content: "Competitive salary and equity packages\n\nComprehensive health, dental, and vision insurance\n\nFlexible work arrangements and remote options\n\nProfessional development budget",
            },
        ],
        jobs: &[
            DemoJob {
                title: "Senior Software Engineer",
                description: "Design and implement scalable backend services with a growing team.",
                location: "San Francisco, CA",
                job_type: JobType::FullTime,
                department: "Engineering",
                salary_range: "$150,000 - $200,000",
                requirements: "Strong understanding of distributed systems\n5+ years of software development experience",
            },
            DemoJob {
                title: "Product Manager",
                description: "Lead product strategy and roadmap for our enterprise suite.",
                location: "New York, NY",
                job_type: JobType::FullTime,
                department: "Product",
                salary_range: "$130,000 - $170,000",
                requirements: "3+ years of product management experience\nExperience with B2B SaaS products",
            },
            DemoJob {
                title: "UX Designer",
                description: "Create intuitive user experiences. Conduct user research and build prototypes.",
                location: "Remote",
                job_type: JobType::FullTime,
                department: "Design",
                salary_range: "$100,000 - $140,000",
                requirements: "Portfolio demonstrating UX/UI design skills\n3+ years of design experience",
            },
            DemoJob {
                title: "Marketing Intern",
                description: "Support content creation, social media management and campaign analysis.",
                location: "New York, NY",
                job_type: JobType::Internship,
                department: "Marketing",
                salary_range: "$25/hour",
                requirements: "Currently pursuing a degree in Marketing or related field\nStrong writing skills",
            },
        ],
    },
    DemoTenant {
        name: "GreenEnergy Inc",
        slug: "greenenergy",
        primary_color: "#059669",
        secondary_color: "#047857",
        recruiter_email: "hr@greenenergy.com",
        recruiter_name: "Jane Doe",
        sections: &[
            DemoSection {
                section_type: SectionType::About,
                title: "About GreenEnergy",
                content: "GreenEnergy Inc is on a mission to accelerate the world's transition to sustainable energy.\n\nWe design, manufacture, and install solar panels, wind turbines, and energy storage solutions.",
            },
            DemoSection {
                section_type: SectionType::Mission,
                title: "Our Mission",
                content: "To make clean energy accessible and affordable for everyone.",
            },
        ],
        jobs: &[
            DemoJob {
                title: "Solar Installation Technician",
                description: "Install solar panel systems for residential and commercial customers.",
                location: "Austin, TX",
                job_type: JobType::FullTime,
                department: "Operations",
                salary_range: "$50,000 - $70,000",
                requirements: "OSHA certification\nExperience with electrical systems",
            },
            DemoJob {
                title: "Part-Time Customer Support",
                description: "Provide phone and email support about installations and billing.",
                location: "Remote",
                job_type: JobType::PartTime,
                department: "Support",
                salary_range: "$20/hour",
                requirements: "Excellent communication skills\nBasic computer skills",
            },
            DemoJob {
                title: "Project Manager",
                description: "Manage large-scale commercial solar installations.",
                location: "Los Angeles, CA",
                job_type: JobType::Contract,
                department: "Operations",
                salary_range: "$80,000 - $110,000",
                requirements: "PMP certification preferred\nStrong organizational skills",
            },
        ],
    },
];

/// Insert any demo tenant that does not exist yet. Returns how many were created.
#[instrument(skip_all, err)]
pub async fn seed_demo_data(pool: &PgPool, config: &Config) -> Result<usize, Error> {
    let params = Argon2Params::from(&config.auth.password);
    let mut created = 0;

    for tenant in TENANTS {
        let mut tx = pool.begin().await.map_err(|e| Error::Database(e.into()))?;

        if Companies::new(&mut tx).get_by_slug(tenant.slug).await?.is_some() {
            info!(slug = tenant.slug, "Demo company already exists, skipping");
            continue;
        }

        let company = Companies::new(&mut tx)
            .create(&CompanyCreateDBRequest {
                name: tenant.name.to_string(),
                slug: tenant.slug.to_string(),
                primary_color: Some(tenant.primary_color.to_string()),
                secondary_color: Some(tenant.secondary_color.to_string()),
            })
            .await?;

        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(DEMO_PASSWORD, params))
            .await
            .map_err(|e| Error::Internal {
                operation: format!("spawn password hashing task: {e}"),
            })??;

        Recruiters::new(&mut tx)
            .create(&RecruiterCreateDBRequest {
                company_id: company.id,
                email: tenant.recruiter_email.to_string(),
                name: tenant.recruiter_name.to_string(),
                password_hash,
            })
            .await?;

        for (position, section) in tenant.sections.iter().enumerate() {
            Sections::new(&mut tx)
                .create(&SectionCreateDBRequest {
                    company_id: company.id,
                    section_type: section.section_type,
                    title: section.title.to_string(),
                    content: section.content.to_string(),
                    media_url: None,
                    order_index: position as i32,
                    is_visible: true,
                })
                .await?;
        }

        for job in tenant.jobs {
            Jobs::new(&mut tx)
                .create(&JobCreateDBRequest {
                    company_id: company.id,
                    title: job.title.to_string(),
                    description: Some(job.description.to_string()),
                    location: Some(job.location.to_string()),
                    job_type: job.job_type,
                    department: Some(job.department.to_string()),
                    salary_range: Some(job.salary_range.to_string()),
                    requirements: Some(job.requirements.to_string()),
                    is_active: true,
                })
                .await?;
        }

        tx.commit().await.map_err(|e| Error::Database(e.into()))?;
        info!(slug = tenant.slug, recruiter = tenant.recruiter_email, "Seeded demo company");
        created += 1;
    }

    Ok(created)
}
