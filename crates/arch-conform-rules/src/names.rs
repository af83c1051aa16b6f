//! Qualified names of the framework types the catalog rules look for.

// Spring web
pub const REST_CONTROLLER: &str = "org.springframework.web.bind.annotation.RestController";
pub const GET_MAPPING: &str = "org.springframework.web.bind.annotation.GetMapping";
pub const PAGE: &str = "org.springframework.data.domain.Page";

// Spring stereotypes
pub const COMPONENT: &str = "org.springframework.stereotype.Component";
pub const SERVICE: &str = "org.springframework.stereotype.Service";
pub const CONTROLLER: &str = "org.springframework.stereotype.Controller";
pub const REPOSITORY: &str = "org.springframework.stereotype.Repository";
pub const CONFIGURATION_PROPERTIES: &str =
    "org.springframework.boot.context.properties.ConfigurationProperties";

// Injection
pub const AUTOWIRED: &str = "org.springframework.beans.factory.annotation.Autowired";
pub const JAVAX_INJECT: &str = "javax.inject.Inject";
pub const JAKARTA_INJECT: &str = "jakarta.inject.Inject";

// Persistence
pub const JAVAX_ENTITY: &str = "javax.persistence.Entity";
pub const JAKARTA_ENTITY: &str = "jakarta.persistence.Entity";
pub const JAVAX_VERSION: &str = "javax.persistence.Version";
pub const JAKARTA_VERSION: &str = "jakarta.persistence.Version";

// JDK and libraries
pub const LIST: &str = "java.util.List";
pub const SET: &str = "java.util.Set";
pub const EXCEPTION: &str = "java.lang.Exception";
pub const RUNTIME_EXCEPTION: &str = "java.lang.RuntimeException";
pub const THROWABLE: &str = "java.lang.Throwable";
pub const SERIALIZABLE: &str = "java.io.Serializable";
pub const OBJECT: &str = "java.lang.Object";
pub const SLF4J_LOGGER: &str = "org.slf4j.Logger";
pub const JODA_NAMESPACE: &str = "org.joda";

/// Annotations marking Spring-managed components.
pub const MANAGED_COMPONENTS: &[&str] = &[
    COMPONENT,
    SERVICE,
    CONFIGURATION_PROPERTIES,
    CONTROLLER,
    REST_CONTROLLER,
    REPOSITORY,
];
