//! Hand-curated learning links used when the live search quota is exhausted.
//! Coverage is partial on purpose: unknown skills resolve to nothing.

use crate::matching::skills::SkillTerm;
use crate::resources::LearningResource;

type CatalogEntry = (&'static str, &'static [(&'static str, &'static str)]);

const REST_API: &[(&str, &str)] = &[
    (
        "REST API Tutorial – freeCodeCamp",
        "https://www.youtube.com/watch?v=-MTSQjw5DrM",
    ),
    ("RESTful API Design", "https://restfulapi.net/"),
];

const CI_CD: &[(&str, &str)] = &[(
    "CI/CD Explained – Fireship",
    "https://www.youtube.com/watch?v=scEDHsr3APg",
)];

static CATALOG: &[CatalogEntry] = &[
    (
        "javascript",
        &[
            (
                "JavaScript Full Course – freeCodeCamp",
                "https://www.youtube.com/watch?v=jS4aFq5-91M",
            ),
            (
                "MDN – JavaScript Guide",
                "https://developer.mozilla.org/docs/Web/JavaScript",
            ),
        ],
    ),
    (
        "typescript",
        &[
            (
                "TypeScript for Beginners – freeCodeCamp",
                "https://www.youtube.com/watch?v=30LWjhZzg50",
            ),
            (
                "TypeScript Handbook",
                "https://www.typescriptlang.org/docs/handbook/intro.html",
            ),
        ],
    ),
    (
        "node",
        &[
            (
                "Node.js Crash Course – Traversy",
                "https://www.youtube.com/watch?v=fBNz5xF-Kx4",
            ),
            ("Node.js Docs", "https://nodejs.org/en/learn"),
        ],
    ),
    (
        "express",
        &[
            (
                "Express.js Crash Course – Traversy",
                "https://www.youtube.com/watch?v=L72fhGm1tfE",
            ),
            (
                "Express Guide",
                "https://expressjs.com/en/starter/installing.html",
            ),
        ],
    ),
    (
        "react",
        &[
            ("React Docs (Beta)", "https://react.dev/learn"),
            (
                "React Course – freeCodeCamp",
                "https://www.youtube.com/watch?v=bMknfKXIFA8",
            ),
        ],
    ),
    (
        "docker",
        &[
            (
                "Docker Tutorial – freeCodeCamp",
                "https://www.youtube.com/watch?v=9zUHg7xjIqQ",
            ),
            (
                "Docker Docs – Get Started",
                "https://docs.docker.com/get-started/",
            ),
        ],
    ),
    (
        "kubernetes",
        &[
            (
                "Kubernetes Course – freeCodeCamp",
                "https://www.youtube.com/watch?v=d6WC5n9G_sM",
            ),
            (
                "Kubernetes Basics",
                "https://kubernetes.io/docs/tutorials/kubernetes-basics/",
            ),
        ],
    ),
    (
        "postgres",
        &[
            (
                "PostgreSQL Tutorial – freeCodeCamp",
                "https://www.youtube.com/watch?v=qw--VYLpxG4",
            ),
            (
                "PostgreSQL Docs",
                "https://www.postgresql.org/docs/current/tutorial.html",
            ),
        ],
    ),
    (
        "aws",
        &[
            (
                "AWS Cloud Practitioner – freeCodeCamp",
                "https://www.youtube.com/watch?v=SOTamWNgDKc",
            ),
            ("AWS Training", "https://www.aws.training/"),
        ],
    ),
    (
        "gcp",
        &[("Google Cloud Training", "https://cloud.google.com/training")],
    ),
    (
        "redis",
        &[
            (
                "Redis Crash Course – Traversy",
                "https://www.youtube.com/watch?v=jgpVdJB2sKQ",
            ),
            ("Redis Docs", "https://redis.io/docs/latest/develop/"),
        ],
    ),
    ("ci", CI_CD),
    ("cd", CI_CD),
    ("api", REST_API),
    ("rest", REST_API),
    (
        "go",
        &[
            (
                "Go Tutorial – freeCodeCamp",
                "https://www.youtube.com/watch?v=un6ZyFkqFKo",
            ),
            ("Tour of Go", "https://go.dev/tour/welcome/1"),
        ],
    ),
];

/// Up to `limit` catalog links for `skill`, in curated order.
pub fn lookup(skill: &SkillTerm, limit: usize) -> Vec<LearningResource> {
    CATALOG
        .iter()
        .find(|(key, _)| *key == skill.as_str())
        .map(|(_, links)| {
            links
                .iter()
                .take(limit)
                .map(|(title, url)| LearningResource {
                    skill: skill.clone(),
                    title: (*title).to_string(),
                    url: (*url).to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}
