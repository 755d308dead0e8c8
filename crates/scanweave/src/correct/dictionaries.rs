//! Embedded word lists for the two supported correction languages.
//!
//! Entries are lowercase and ordered by rough frequency so that candidate
//! ranking is deterministic. The lists mix high-frequency function words
//! with vocabulary common in scanned business documents.

pub(crate) const SPANISH: &[&str] = &[
    // function words
    "de", "la", "que", "el", "en", "y", "a", "los", "del", "se", "las", "por",
    "un", "para", "con", "no", "una", "su", "al", "lo", "como", "más", "pero",
    "sus", "le", "ya", "o", "este", "sí", "porque", "esta", "entre", "cuando",
    "muy", "sin", "sobre", "también", "me", "hasta", "hay", "donde", "quien",
    "desde", "todo", "nos", "durante", "todos", "uno", "les", "ni", "contra",
    "otros", "ese", "eso", "ante", "ellos", "esto", "antes", "algunos", "qué",
    "unos", "yo", "otro", "otras", "otra", "él", "tanto", "esa", "estos",
    "mucho", "quienes", "nada", "muchos", "cual", "poco", "ella", "estar",
    "estas", "algunas", "algo", "nosotros", "mis", "tus", "ellas", "cada",
    "varios", "varias", "según", "además", "embargo", "través", "mismo",
    "misma", "siguiente", "anterior", "primero", "segundo", "tercero",
    "último", "última", "nuevo", "nueva", "buenos", "buenas", "grande",
    "pequeño", "alto", "bajo", "largo", "corto", "mejor", "peor", "bien",
    "mal", "siempre", "nunca", "ahora", "después", "luego", "hoy", "ayer",
    "mañana",
    // common verbs
    "ser", "haber", "tener", "hacer", "poder", "decir", "ir", "ver",
    "dar", "saber", "querer", "deber", "pasar", "poner", "llegar", "dejar",
    "seguir", "encontrar", "llamar", "venir", "pensar", "salir", "volver",
    "tomar", "tratar", "mirar", "contar", "empezar", "esperar", "buscar",
    "existir", "entrar", "trabajar", "escribir", "perder", "producir",
    "tiene", "tienen", "puede", "pueden", "debe", "deben", "hace", "hacen",
    "dice", "dicen", "está", "están",
    // everyday nouns
    "hola", "mundo", "casa", "tiempo", "día", "días", "año", "años", "vida",
    "país", "trabajo", "ciudad", "parte", "persona", "personas", "lugar",
    "momento", "forma", "manera", "ejemplo", "caso", "semana", "mes", "meses",
    "hora", "horas", "minuto", "minutos", "gracias", "saludos", "señor",
    "señora", "agua", "tierra", "mano", "ojos", "noche", "cabeza", "palabra",
    "palabras", "historia", "puerta", "camino", "papel",
    // document vocabulary
    "nombre", "fecha", "firma", "carta", "página", "páginas", "número",
    "números", "total", "precio", "precios", "importe", "factura", "facturas",
    "recibo", "recibos", "pago", "pagos", "cuenta", "cuentas", "cliente",
    "clientes", "empresa", "empresas", "documento", "documentos", "archivo",
    "archivos", "texto", "textos", "imagen", "imágenes", "tabla", "tablas",
    "datos", "dato", "valor", "valores", "cantidad", "cantidades", "unidad",
    "unidades", "producto", "productos", "servicio", "servicios",
    "dirección", "calle", "teléfono", "correo", "mensaje", "asunto",
    "referencia", "código", "códigos", "artículo", "artículos",
    "descripción", "concepto", "conceptos", "subtotal", "impuesto",
    "impuestos", "descuento", "descuentos", "envío", "entrega", "pedido",
    "pedidos", "orden", "contrato", "contratos", "acuerdo", "informe",
    "informes", "resumen", "resultado", "resultados", "análisis", "sistema",
    "sistemas", "proceso", "procesos", "calidad", "atentamente", "estimado",
    "estimada", "presente", "adjunto", "adjunta", "oficina", "departamento",
    "sección", "apartado", "condiciones", "términos", "observaciones",
    "vencimiento", "emisión", "domicilio", "provincia", "localidad",
    "postal", "identificación", "registro", "solicitud", "formulario",
    "pendiente", "final",
];

pub(crate) const ENGLISH: &[&str] = &[
    // function words
    "the", "of", "and", "to", "in", "is", "was", "for", "that", "with",
    "his", "they", "at", "be", "this", "have", "from", "or", "one", "had",
    "by", "but", "not", "what", "all", "were", "when", "your", "can",
    "said", "there", "use", "each", "which", "she", "how", "their", "will",
    "other", "about", "out", "many", "then", "them", "these", "some", "her",
    "would", "make", "like", "him", "into", "time", "has", "look", "two",
    "more", "write", "see", "way", "could", "than", "first", "been",
    "call", "who", "its", "now", "find", "long", "down", "did", "get",
    "come", "made", "may", "part", "over", "also", "after", "most",
    "should", "because", "through", "before", "between", "under", "while",
    "where", "every", "several", "according", "same", "such", "only",
    "very", "just", "any", "both", "during", "without", "within", "again",
    "always", "never", "often", "however", "therefore", "although",
    // common verbs and adjectives
    "being", "does", "doing", "went", "gone", "take", "taken", "give",
    "given", "know", "known", "think", "thought", "work", "working", "good",
    "better", "best", "large", "small", "high", "low", "new", "old",
    "early", "late", "next", "last", "second", "third", "following",
    "previous", "attached", "important", "available", "required",
    // everyday nouns
    "hello", "world", "people", "water", "house", "city", "country",
    "year", "years", "month", "months", "week", "weeks", "day", "days",
    "hour", "hours", "today", "yesterday", "tomorrow", "person", "place",
    "moment", "example", "case", "thing", "things", "word", "words",
    "number", "numbers", "group", "problem", "question", "story", "night",
    "head", "hand", "eyes", "door", "road", "paper", "thanks", "regards",
    "sincerely", "dear",
    // document vocabulary
    "name", "date", "signature", "letter", "letters", "page", "pages",
    "total", "price", "prices", "invoice", "invoices", "receipt",
    "receipts", "payment", "payments", "account", "accounts", "customer",
    "customers", "company", "companies", "document", "documents", "file",
    "files", "text", "image", "images", "table", "tables", "data", "value",
    "values", "amount", "amounts", "quantity", "quantities", "unit",
    "units", "product", "products", "service", "services", "address",
    "street", "phone", "email", "message", "subject", "reference", "code",
    "codes", "article", "articles", "description", "concept", "subtotal",
    "tax", "taxes", "discount", "discounts", "shipping", "delivery",
    "order", "orders", "contract", "contracts", "agreement", "report",
    "reports", "summary", "result", "results", "analysis", "system",
    "systems", "process", "processes", "quality", "office", "department",
    "section", "terms", "conditions", "notes", "due", "issued", "billing",
    "registration", "request", "form", "identification", "province",
    "postal",
];
